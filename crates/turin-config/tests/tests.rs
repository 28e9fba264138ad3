// Integration-test harness for turin-config.
//
// Keeping only this file at the root of `tests/` builds every integration
// test into one binary.

mod suite;
