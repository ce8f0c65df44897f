use pretty_assertions::assert_eq;

use super::*;

#[test]
fn only_scalar_fields() {
    let definition = fixtures::definition();
    let query = optimize(&definition, "{ fruits { id name } }");

    insta::assert_snapshot!(query, @"Fruit only(id, name)");
    assert!(query.joins().is_empty());
    assert!(query.prefetches().is_empty());
    assert_eq!(query.loaded_fields(), Some(vec!["id", "name"]));
    assert_eq!(query.round_trips(), 1);
}

#[test]
fn foreign_key_column() {
    let definition = fixtures::definition();
    let query = optimize(&definition, "{ fruits { colorId } }");

    insta::assert_snapshot!(query, @"Fruit only(color_id)");
    assert_eq!(query.loaded_fields(), Some(vec!["color"]));
}

#[test]
fn unresolvable_field_loads_every_column() {
    let definition = fixtures::definition();
    let query = optimize(&definition, "{ fruits { id description } }");

    insta::assert_snapshot!(query, @"Fruit");
    assert_eq!(query.loaded_fields(), None);
}

#[test]
fn keep_column_restriction() {
    let definition = fixtures::definition();
    let config = OptimizerConfig {
        keep_column_restriction: true,
        ..Default::default()
    };

    let query = optimize_with(&definition, config, "{ fruits { id description } }");

    insta::assert_snapshot!(query, @"Fruit only(id)");
}

#[test]
fn undeclared_fields_are_ignored() {
    let definition = fixtures::definition();
    let query = optimize(&definition, "{ fruits { id ripeness } }");

    insta::assert_snapshot!(query, @"Fruit only(id)");
}

#[test]
fn meta_fields_and_aliases() {
    let definition = fixtures::definition();
    let query = optimize(&definition, "{ fruits { __typename id identifier: id } }");

    insta::assert_snapshot!(query, @"Fruit only(id)");
}

#[test]
fn empty_selection() {
    let definition = fixtures::definition();
    let registry = fixtures::registry();
    let fruits = root_field("{ fruits }");

    let query = ModelQuery::all(&definition, "Fruit").unwrap();
    let store = QueryOptimizer::new(&registry, &definition).plan(&query, &fruits.selections, "Fruit");

    assert!(store.is_empty());
    insta::assert_snapshot!(optimize(&definition, "{ fruits }"), @"Fruit");
}

#[test]
fn type_without_model() {
    let definition = fixtures::definition();
    let query = optimize(&definition, "{ weather { temperature } }");

    insta::assert_snapshot!(query, @"Fruit");
}

#[test]
fn verbatim_naming_convention() {
    let definition = fixtures::definition();
    let config = OptimizerConfig {
        naming_convention: crate::NamingConvention::Verbatim,
        ..Default::default()
    };

    let query = optimize_with(&definition, config, "{ fruits { color_id colorId } }");

    insta::assert_snapshot!(query, @"Fruit only(color_id)");
}

#[test]
fn optimizing_twice_gives_the_same_plan() {
    let definition = fixtures::definition();
    let document = "{ colors { id palette { name } fruits { name tags { name } } } }";

    let first = optimize(&definition, document);
    let second = optimize(&definition, document);

    assert_eq!(first.to_string(), second.to_string());
}
