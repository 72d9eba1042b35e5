//! Whole-game scenarios driven through the public game API
