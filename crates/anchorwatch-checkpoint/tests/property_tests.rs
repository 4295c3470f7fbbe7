//! Property-based tests for the checkpoint chain.

mod property {
    mod checkpoint_properties;
}
