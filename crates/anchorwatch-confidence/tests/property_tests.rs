mod property {
    mod confidence_properties;
}
