mod collection;
mod common;
