//! Persistence across sessions over file storage.
//!
//! Each `session()` call stands in for one run of the application: a fresh
//! provider over the same data directory, mounted once.

#![allow(clippy::unwrap_used)]

use cart_calc_core::{ItemName, Price, Quantity};
use cart_calc_integration_tests::TestEnv;
use rust_decimal::Decimal;
use serde_json::Value;

fn name(s: &str) -> ItemName {
    ItemName::parse(s).unwrap()
}

fn qty(n: u32) -> Quantity {
    Quantity::from_u32(n).unwrap()
}

#[test]
fn test_first_run_starts_empty_without_error() {
    let env = TestEnv::new().unwrap();
    let state = env.session().unwrap();

    assert!(state.stores().is_mounted());
    assert!(state.stores().cart().is_empty());
    assert_eq!(state.stores().cart().total(), Decimal::ZERO);
    assert!(state.stores().shopping_list().is_empty());
}

#[test]
fn test_cart_survives_restart() {
    let env = TestEnv::new().unwrap();

    {
        let mut state = env.session().unwrap();
        let cart = state.stores_mut().cart_mut();
        cart.add_item(name("Milk"), qty(2), Price::parse("3.50").unwrap());
        cart.add_item(name("Bread"), qty(1), Price::parse("5.00").unwrap());
    }

    let state = env.session().unwrap();
    let cart = state.stores().cart();
    let names: Vec<&str> = cart.items().iter().map(|item| item.name.as_str()).collect();
    assert_eq!(names, ["Milk", "Bread"]);
    assert_eq!(cart.total(), Decimal::new(1200, 2));
}

#[test]
fn test_shopping_list_survives_restart() {
    let env = TestEnv::new().unwrap();

    let eggs = {
        let mut state = env.session().unwrap();
        let list = state.stores_mut().shopping_list_mut();
        let eggs = list.add_item(name("Eggs"), qty(12));
        list.add_item(name("Milk"), qty(1));
        list.toggle_item(&eggs);
        eggs
    };

    let state = env.session().unwrap();
    let list = state.stores().shopping_list();
    assert_eq!(list.len(), 2);
    assert!(list.get(&eggs).unwrap().completed);
    assert_eq!(list.progress().to_string(), "1/2");
}

#[test]
fn test_snapshot_layout_on_disk() {
    let env = TestEnv::new().unwrap();
    {
        let mut state = env.session().unwrap();
        state.stores_mut().cart_mut().add_item(
            name("Milk"),
            qty(2),
            Price::parse("3.50").unwrap(),
        );
        state
            .stores_mut()
            .shopping_list_mut()
            .add_item(name("Eggs"), qty(12));
    }

    let cart: Value = serde_json::from_str(&env.read_snapshot("cart-storage").unwrap().unwrap()).unwrap();
    let item = &cart["items"][0];
    assert_eq!(item["name"], "Milk");
    assert_eq!(item["quantity"].as_f64(), Some(2.0));
    assert_eq!(item["price"].as_f64(), Some(3.5));
    assert!(item["id"].as_str().is_some_and(|id| !id.is_empty()));
    assert_eq!(cart["total"].as_f64(), Some(7.0));

    let list: Value =
        serde_json::from_str(&env.read_snapshot("shopping-list-storage").unwrap().unwrap()).unwrap();
    assert_eq!(list["items"][0]["completed"], false);
    assert!(list.get("total").is_none());
}

#[test]
fn test_clear_is_persisted() {
    let env = TestEnv::new().unwrap();
    {
        let mut state = env.session().unwrap();
        state.stores_mut().cart_mut().add_item(
            name("Milk"),
            qty(1),
            Price::parse("3.50").unwrap(),
        );
        state.stores_mut().cart_mut().clear_cart();
    }

    let state = env.session().unwrap();
    assert!(state.stores().cart().is_empty());
    assert_eq!(state.stores().cart().total(), Decimal::ZERO);
}

#[test]
fn test_stale_total_is_recomputed_on_restore() {
    let env = TestEnv::new().unwrap();
    env.write_snapshot(
        "cart-storage",
        r#"{"items":[{"id":"a1","name":"Milk","quantity":2,"price":3.5}],"total":999}"#,
    )
    .unwrap();

    let state = env.session().unwrap();
    assert_eq!(state.stores().cart().total(), Decimal::new(7, 0));

    // Hydration writes the normalized snapshot back.
    let saved: Value = serde_json::from_str(&env.read_snapshot("cart-storage").unwrap().unwrap()).unwrap();
    assert_eq!(saved["total"].as_f64(), Some(7.0));
}

#[test]
fn test_malformed_snapshots_fall_back_to_empty() {
    let env = TestEnv::new().unwrap();
    env.write_snapshot("cart-storage", "{not json").unwrap();
    env.write_snapshot(
        "shopping-list-storage",
        r#"{"items":[{"id":"x","name":"","quantity":1,"completed":false}]}"#,
    )
    .unwrap();

    let mut state = env.session().unwrap();
    assert!(state.stores().cart().is_empty());
    assert!(state.stores().shopping_list().is_empty());

    // The stores stay usable.
    state
        .stores_mut()
        .shopping_list_mut()
        .add_item(name("Eggs"), qty(12));
    assert_eq!(state.stores().shopping_list().len(), 1);
}

#[test]
fn test_old_ids_survive_restore() {
    let env = TestEnv::new().unwrap();
    env.write_snapshot(
        "shopping-list-storage",
        r#"{"items":[{"id":"1700000000000abc123xyz","name":"Rice","quantity":1,"completed":true}]}"#,
    )
    .unwrap();

    let mut state = env.session().unwrap();
    let list = state.stores_mut().shopping_list_mut();
    let id = list.items().first().unwrap().id.clone();
    assert_eq!(id.as_str(), "1700000000000abc123xyz");

    assert!(list.toggle_item(&id));
    assert!(!list.get(&id).unwrap().completed);
}

#[test]
fn test_mutation_before_mount_does_not_clobber_stored_state() {
    let env = TestEnv::new().unwrap();
    {
        let mut state = env.session().unwrap();
        state.stores_mut().cart_mut().add_item(
            name("Milk"),
            qty(2),
            Price::parse("3.50").unwrap(),
        );
    }
    let before = env.read_snapshot("cart-storage").unwrap();

    let mut provider = env.unmounted_provider().unwrap();
    provider
        .cart_mut()
        .add_item(name("Gum"), qty(1), Price::parse("1").unwrap());
    assert_eq!(env.read_snapshot("cart-storage").unwrap(), before);

    assert_eq!(provider.mount(), 2);
    assert_eq!(provider.cart().len(), 1);
    assert_eq!(provider.cart().total(), Decimal::new(7, 0));
}

#[test]
fn test_mount_is_idempotent_across_calls() {
    let env = TestEnv::new().unwrap();
    let mut provider = env.unmounted_provider().unwrap();

    assert_eq!(provider.mount(), 2);
    env.write_snapshot(
        "cart-storage",
        r#"{"items":[{"id":"a1","name":"Milk","quantity":1,"price":1}],"total":1}"#,
    )
    .unwrap();
    assert_eq!(provider.mount(), 0);
    assert!(provider.cart().is_empty());
}

#[test]
fn test_stored_values_beyond_input_limits_are_restored() {
    let env = TestEnv::new().unwrap();
    env.write_snapshot(
        "cart-storage",
        r#"{"items":[
            {"id":"c1","name":"Rice","quantity":2000000,"price":1},
            {"id":"c2","name":"Milk","quantity":2,"price":3.5}
        ],"total":0}"#,
    )
    .unwrap();
    let long_name = "x".repeat(ItemName::MAX_LENGTH + 1);
    env.write_snapshot(
        "shopping-list-storage",
        &format!(
            r#"{{"items":[
                {{"id":"s1","name":"{long_name}","quantity":1,"completed":false}},
                {{"id":"s2","name":"Eggs","quantity":12,"completed":true}}
            ]}}"#
        ),
    )
    .unwrap();

    let state = env.session().unwrap();
    let cart = state.stores().cart();
    assert_eq!(cart.len(), 2);
    assert_eq!(cart.total(), Decimal::new(2_000_007, 0));
    let list = state.stores().shopping_list();
    assert_eq!(list.len(), 2);
    assert_eq!(list.items().first().unwrap().name.as_str(), long_name);

    let saved: Value = serde_json::from_str(&env.read_snapshot("cart-storage").unwrap().unwrap()).unwrap();
    assert_eq!(saved["items"].as_array().map(Vec::len), Some(2));
    assert_eq!(saved["total"].as_f64(), Some(2_000_007.0));
}
