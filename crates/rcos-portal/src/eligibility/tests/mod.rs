mod check;
mod common;
