pub mod test_helpers;
