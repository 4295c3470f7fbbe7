mod property {
    mod budget_properties;
}
