#![doc(test(attr(deny(warnings))))]

//! ProStep is a four-step registration wizard: personal details, account
//! credentials, preferences and a final review. The [`wizard`] module holds
//! the validation and state transition core; [`cli`] is a terminal front end.

pub mod cli;
pub mod config;
pub mod errors;
pub mod storage;
pub mod utils;
pub mod wizard;

/// Initializes global tracing. Safe to call more than once.
pub fn init() {
    utils::init_tracing();
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_is_idempotent() {
        super::init();
        super::init();
    }
}
