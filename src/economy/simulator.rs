//! Balance simulator for the tap economy.
//! Run with: cargo test -p coin-tapper simulate_session -- --nocapture
