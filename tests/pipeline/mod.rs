//! End-to-end builds over temporary package trees

mod test_collision;
mod test_determinism;
mod test_layouts;
mod test_roundtrip;
