use super::*;

#[test]
fn rows_are_walked_at_the_paginated_level() {
    let definition = fixtures::definition();
    let query = optimize(&definition, "{ fruits { rows { id name } total } }");

    insta::assert_snapshot!(query, @"Fruit only(id, name)");
}

#[test]
fn paginated_prefetch() {
    let definition = fixtures::definition();
    let query = optimize(&definition, "{ colors { fruits { rows { id } } } }");

    insta::assert_snapshot!(query, @"Color prefetches(fruits => [Fruit only(id, color)])");
}

#[test]
fn rows_share_the_level_with_their_siblings() {
    let definition = fixtures::definition();

    let query = optimize(&definition, "{ fruits { id rows { id name } } }");
    insta::assert_snapshot!(query, @"Fruit only(id, name)");

    let query = optimize(&definition, "{ colors { fruits { id } rows { fruits { name } } } }");
    insta::assert_snapshot!(query, @"Color prefetches(fruits => [Fruit only(id, color)])");
}

#[test]
fn rows_without_selection_are_a_regular_field() {
    let definition = fixtures::definition();
    let query = optimize(&definition, "{ fruits { id rows } }");

    insta::assert_snapshot!(query, @"Fruit only(id)");
}

#[test]
fn configured_pagination_field() {
    let definition = fixtures::definition();

    let config = OptimizerConfig::from_toml(r#"pagination_field = "items""#).unwrap();
    let query = optimize_with(&definition, config, "{ fruits { items { id } rows { name } } }");
    insta::assert_snapshot!(query, @"Fruit only(id)");

    let config = OptimizerConfig::from_toml("pagination_passthrough = false").unwrap();
    let query = optimize_with(&definition, config, "{ fruits { rows { id } } }");
    insta::assert_snapshot!(query, @"Fruit");
}
