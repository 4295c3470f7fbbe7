mod property {
    mod learning_properties;
}
