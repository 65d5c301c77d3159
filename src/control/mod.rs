//! Control laws that run inside the application core.

pub mod compare_pair;
