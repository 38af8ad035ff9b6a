//! Library side of the cornell CLI: the debugging views behind `cornell inspect`.

pub mod inspect;
