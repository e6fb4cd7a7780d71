//! Edge case and property tests for sablec-lex.
