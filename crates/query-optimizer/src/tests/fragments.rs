use indoc::indoc;
use pretty_assertions::assert_eq;

use super::*;

#[test]
fn spread_is_the_same_as_inlining() {
    let definition = fixtures::definition();

    let spread = optimize(
        &definition,
        indoc! {r#"
            query {
              fruits {
                ...FruitFields
                color { id }
              }
            }

            fragment FruitFields on Fruit {
              id
              name
            }
        "#},
    );

    let inlined = optimize(&definition, "{ fruits { id name color { id } } }");

    assert_eq!(spread.to_string(), inlined.to_string());
    insta::assert_snapshot!(spread, @"Fruit joins(color) only(id, name, color, color__id)");

    let spread = optimize(
        &definition,
        indoc! {r#"
            query {
              colors {
                fruits { id }
                ...ColorFruits
              }
            }

            fragment ColorFruits on Color {
              fruits { name }
            }
        "#},
    );

    let inlined = optimize(&definition, "{ colors { fruits { id } fruits { name } } }");

    assert_eq!(spread.to_string(), inlined.to_string());
    insta::assert_snapshot!(spread, @"Color prefetches(fruits => [Fruit only(id, color)])");
}

#[test]
fn field_repeated_in_a_spread_is_planned_once() {
    let definition = fixtures::definition();

    let spread = optimize(
        &definition,
        indoc! {r#"
            query {
              fruits {
                id
                color { id }
                ...FruitFields
              }
            }

            fragment FruitFields on Fruit {
              id
              color { name }
            }
        "#},
    );

    let inlined = optimize(&definition, "{ fruits { id color { id } id color { name } } }");

    assert_eq!(spread.to_string(), inlined.to_string());
    insta::assert_snapshot!(spread, @"Fruit joins(color) only(id, color, color__id)");
}

#[test]
fn spread_inside_a_prefetch() {
    let definition = fixtures::definition();

    let query = optimize(
        &definition,
        indoc! {r#"
            query {
              colors {
                fruits { ...FruitFields }
              }
            }

            fragment FruitFields on Fruit {
              id
              name
              color { name }
            }
        "#},
    );

    insta::assert_snapshot!(query, @"Color prefetches(fruits => [Fruit joins(color) only(id, name, color, color__name)])");
}

#[test]
fn nested_spreads() {
    let definition = fixtures::definition();

    let query = optimize(
        &definition,
        indoc! {r#"
            query {
              fruits { ...FruitFields }
            }

            fragment FruitFields on Fruit {
              id
              color { ...ColorFields }
            }

            fragment ColorFields on Color {
              name
              palette { name }
            }
        "#},
    );

    insta::assert_snapshot!(query, @"Fruit joins(color__palette) only(id, color, color__name, color__palette, color__palette__name)");
}

#[test]
fn unresolvable_field_in_a_spread() {
    let definition = fixtures::definition();

    let query = optimize(
        &definition,
        indoc! {r#"
            query {
              fruits { id ...Described }
            }

            fragment Described on Fruit {
              description
            }
        "#},
    );

    insta::assert_snapshot!(query, @"Fruit");
}
