//! Whole-game scenarios driven through the headless backend

mod scenarios;
