//! End-to-end polymorphism test: two concrete filter types behind one
//! interface, boxed and dispatched through the interface's method table.

use mallard::{
    FieldDef, IfaceValue, MethodFn, MethodSig, PrimitiveKind, Receiver, TypeHash,
    TypeRegistry, Value, call_method,
};

fn int_hash() -> TypeHash {
    PrimitiveKind::Int.type_hash()
}

fn string_hash() -> TypeHash {
    PrimitiveKind::Str.type_hash()
}

fn ints(values: &[i64]) -> Value {
    Value::Slice(values.iter().copied().map(Value::Int).collect())
}

/// Build a registry with:
///
/// - `interface Filter { About() string; Process([]int) []int }`
/// - `UniqueFilter`, which keeps the first occurrence of each value
/// - `MultipleFilter`, which keeps the distinct multiples of its factor
fn filter_registry() -> (TypeRegistry, TypeHash, TypeHash, TypeHash) {
    let mut registry = TypeRegistry::with_primitives();
    let int_slice = registry.slice_of(int_hash()).unwrap();

    let filter = registry
        .register_interface(
            "Filter",
            vec![
                MethodSig::new("About", vec![], Some(string_hash())),
                MethodSig::new("Process", vec![int_slice], Some(int_slice)),
            ],
            vec![],
        )
        .unwrap();

    let unique = registry.register_struct("UniqueFilter", vec![]).unwrap();
    registry
        .register_method(
            unique,
            Receiver::Value,
            MethodSig::new("About", vec![], Some(string_hash())),
            MethodFn::new(|_, _| Ok(Value::Str("keep one copy of each value".into()))),
        )
        .unwrap();
    registry
        .register_method(
            unique,
            Receiver::Value,
            MethodSig::new("Process", vec![int_slice], Some(int_slice)),
            MethodFn::new(|_, args| {
                let Some(Value::Slice(items)) = args.first() else {
                    return Ok(Value::Slice(vec![]));
                };
                let mut out: Vec<Value> = Vec::new();
                for item in items {
                    if !out.contains(item) {
                        out.push(item.clone());
                    }
                }
                Ok(Value::Slice(out))
            }),
        )
        .unwrap();

    let multiple = registry
        .register_struct(
            "MultipleFilter",
            vec![FieldDef::named("factor", int_hash())],
        )
        .unwrap();
    registry
        .register_method(
            multiple,
            Receiver::Value,
            MethodSig::new("About", vec![], Some(string_hash())),
            MethodFn::new(|recv, _| {
                let factor = match recv {
                    Value::Struct { fields, .. } => match fields.first() {
                        Some(Value::Int(n)) => *n,
                        _ => 0,
                    },
                    _ => 0,
                };
                Ok(Value::Str(format!("keep the distinct multiples of {}", factor)))
            }),
        )
        .unwrap();
    registry
        .register_method(
            multiple,
            Receiver::Value,
            MethodSig::new("Process", vec![int_slice], Some(int_slice)),
            MethodFn::new(|recv, args| {
                let factor = match recv {
                    Value::Struct { fields, .. } => match fields.first() {
                        Some(Value::Int(n)) => *n,
                        _ => 1,
                    },
                    _ => 1,
                };
                let Some(Value::Slice(items)) = args.first() else {
                    return Ok(Value::Slice(vec![]));
                };
                let mut out: Vec<Value> = Vec::new();
                for item in items {
                    let Value::Int(n) = item else { continue };
                    if factor != 0 && n % factor == 0 && !out.contains(item) {
                        out.push(item.clone());
                    }
                }
                Ok(Value::Slice(out))
            }),
        )
        .unwrap();

    (registry, filter, unique, multiple)
}

#[test]
fn both_filters_satisfy_the_interface() {
    let (registry, filter, unique, multiple) = filter_registry();
    assert!(registry.satisfies(unique, filter).unwrap());
    assert!(registry.satisfies(multiple, filter).unwrap());

    // string does not: Process and About are missing.
    assert!(!registry.satisfies(string_hash(), filter).unwrap());
}

#[test]
fn unique_filter_drops_repeats() {
    let (registry, filter, unique, _) = filter_registry();

    let boxed = IfaceValue::box_value(
        &registry,
        filter,
        unique,
        Value::Struct {
            type_hash: unique,
            fields: vec![],
        },
    )
    .unwrap();

    let input = ints(&[12, 7, 21, 12, 12, 26, 25, 21, 30]);
    let output = call_method(&registry, &boxed, filter, "Process", &[input]).unwrap();
    assert_eq!(output, ints(&[12, 7, 21, 26, 25, 30]));
}

#[test]
fn multiple_filter_keeps_distinct_multiples() {
    let (registry, filter, _, multiple) = filter_registry();

    let boxed = IfaceValue::box_value(
        &registry,
        filter,
        multiple,
        Value::Struct {
            type_hash: multiple,
            fields: vec![Value::Int(2)],
        },
    )
    .unwrap();

    let input = ints(&[12, 7, 21, 12, 12, 26, 25, 21, 30]);
    let output = call_method(&registry, &boxed, filter, "Process", &[input]).unwrap();
    assert_eq!(output, ints(&[12, 26, 30]));
}

#[test]
fn filters_chain_through_one_interface_slot() {
    let (registry, filter, unique, multiple) = filter_registry();

    let slots = [
        IfaceValue::box_value(
            &registry,
            filter,
            unique,
            Value::Struct {
                type_hash: unique,
                fields: vec![],
            },
        )
        .unwrap(),
        IfaceValue::box_value(
            &registry,
            filter,
            multiple,
            Value::Struct {
                type_hash: multiple,
                fields: vec![Value::Int(2)],
            },
        )
        .unwrap(),
    ];

    // The same interface-typed slot dispatches to either implementation.
    let mut values = ints(&[12, 7, 21, 12, 12, 26, 25, 21, 30]);
    for slot in &slots {
        let about = call_method(&registry, slot, filter, "About", &[]).unwrap();
        assert!(matches!(about, Value::Str(_)));
        values = call_method(&registry, slot, filter, "Process", &[values]).unwrap();
    }
    assert_eq!(values, ints(&[12, 26, 30]));
}

#[test]
fn about_describes_each_filter() {
    let (registry, filter, unique, multiple) = filter_registry();

    let unique_boxed = IfaceValue::box_value(
        &registry,
        filter,
        unique,
        Value::Struct {
            type_hash: unique,
            fields: vec![],
        },
    )
    .unwrap();
    let about = call_method(&registry, &unique_boxed, filter, "About", &[]).unwrap();
    assert_eq!(about, Value::Str("keep one copy of each value".into()));

    let multiple_boxed = IfaceValue::box_value(
        &registry,
        filter,
        multiple,
        Value::Struct {
            type_hash: multiple,
            fields: vec![Value::Int(2)],
        },
    )
    .unwrap();
    let about = call_method(&registry, &multiple_boxed, filter, "About", &[]).unwrap();
    assert_eq!(about, Value::Str("keep the distinct multiples of 2".into()));
}
