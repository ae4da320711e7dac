use xmlseed_core::{Builtin, CompiledSchema, Facets, QName, SchemaIndex, SimpleTypeDef, SimpleVariety};
use xmlseed_generate::generators::{EnumCycle, TextGenerator};
use xmlseed_generate::{GeneratorFactory, IdRegistry, ValueGenerator};

fn simple_type(name: &str, variety: SimpleVariety, facets: Facets) -> SimpleTypeDef {
    SimpleTypeDef {
        name: QName::new(name, "urn:test"),
        base: None,
        variety,
        facets,
    }
}

fn take(generator: &mut ValueGenerator, count: usize) -> Vec<String> {
    (0..count).map(|_| generator.next_value()).collect()
}

#[test]
fn integer_values_stay_inside_facet_bounds() {
    let schema = CompiledSchema::new("0.1");
    let index = SchemaIndex::new(&schema);
    let factory = GeneratorFactory::new(&index, 3, IdRegistry::shared());
    let facets = Facets {
        min_inclusive: Some("-5".to_string()),
        max_exclusive: Some("10".to_string()),
        ..Facets::default()
    };

    let mut generator = factory.builtin(Builtin::Int, &facets, 0);
    assert_eq!(generator.id(), "integer");
    let values: Vec<i64> = take(&mut generator, 50)
        .iter()
        .map(|value| value.parse().expect("integer literal"))
        .collect();

    assert_eq!(values[0], -5, "a lower bound pins the first value");
    assert!(values.contains(&9), "upper edge is visited");
    assert!(values.iter().all(|value| (-5..=9).contains(value)));
}

#[test]
fn decimal_values_respect_fraction_digits_and_bounds() {
    let schema = CompiledSchema::new("0.1");
    let index = SchemaIndex::new(&schema);
    let factory = GeneratorFactory::new(&index, 3, IdRegistry::shared());
    let facets = Facets {
        min_inclusive: Some("0.5".to_string()),
        max_inclusive: Some("2.5".to_string()),
        fraction_digits: Some(2),
        ..Facets::default()
    };

    let mut generator = factory.builtin(Builtin::Decimal, &facets, 0);
    for value in take(&mut generator, 20) {
        let parsed: f64 = value.parse().expect("decimal literal");
        assert!((0.5..=2.5).contains(&parsed), "{value} out of range");
        let fraction = value.split('.').nth(1).unwrap_or("");
        assert!(fraction.len() <= 2, "{value} has too many fraction digits");
    }
}

#[test]
fn enumeration_repeats_with_its_own_period() {
    let values = vec!["red".to_string(), "green".to_string(), "blue".to_string()];
    let mut cycle = EnumCycle::new(&values).expect("non-empty enumeration");
    let produced: Vec<String> = (0..6).map(|_| cycle.next_value()).collect();
    assert_eq!(produced, ["red", "green", "blue", "red", "green", "blue"]);

    assert!(EnumCycle::new(&[]).is_none());
}

#[test]
fn enumeration_overrides_the_base_type() {
    let schema = CompiledSchema::new("0.1");
    let index = SchemaIndex::new(&schema);
    let factory = GeneratorFactory::new(&index, 3, IdRegistry::shared());
    let def = simple_type(
        "Size",
        SimpleVariety::Atomic {
            primitive: Builtin::Int,
        },
        Facets {
            enumeration: vec!["10".to_string(), "20".to_string()],
            ..Facets::default()
        },
    );

    let mut generator = factory.for_simple_type(&def, "size");
    assert_eq!(generator.id(), "enumeration");
    assert_eq!(take(&mut generator, 3), ["10", "20", "10"]);
}

#[test]
fn exact_length_is_honoured_for_every_target() {
    for length in 1..=20_u64 {
        let facets = Facets {
            length: Some(length),
            ..Facets::default()
        };
        let mut generator = ValueGenerator::Text(TextGenerator::plain(&facets));
        generator.set_prefix("description");
        for value in take(&mut generator, 12) {
            assert_eq!(
                value.chars().count() as u64,
                length,
                "{value:?} for length {length}"
            );
        }
    }
}

#[test]
fn min_and_max_length_are_applied_independently() {
    let long = Facets {
        min_length: Some(10),
        ..Facets::default()
    };
    let mut padded = ValueGenerator::Text(TextGenerator::plain(&long));
    padded.set_prefix("id");
    assert_eq!(padded.next_value(), "idxxxxxxx1");

    let short = Facets {
        max_length: Some(3),
        ..Facets::default()
    };
    let mut cut = ValueGenerator::Text(TextGenerator::plain(&short));
    cut.set_prefix("description");
    assert_eq!(cut.next_value(), "de1");
}

#[test]
fn union_alternates_between_member_generators() {
    let schema = CompiledSchema::new("0.1");
    let index = SchemaIndex::new(&schema);
    let factory = GeneratorFactory::new(&index, 3, IdRegistry::shared());
    let def = simple_type(
        "Flag",
        SimpleVariety::Union {
            member_types: vec![QName::xs("boolean"), QName::xs("int")],
        },
        Facets::default(),
    );

    let mut generator = factory.for_simple_type(&def, "flag");
    assert_eq!(generator.id(), "union");
    assert_eq!(
        take(&mut generator, 4),
        ["true", "1", "false", "-2147483648"]
    );
}

#[test]
fn list_length_facet_sets_the_item_count() {
    let schema = CompiledSchema::new("0.1");
    let index = SchemaIndex::new(&schema);
    let factory = GeneratorFactory::new(&index, 3, IdRegistry::shared());
    let def = simple_type(
        "Numbers",
        SimpleVariety::List {
            item_type: QName::xs("int"),
        },
        Facets {
            length: Some(3),
            ..Facets::default()
        },
    );

    let mut generator = factory.for_simple_type(&def, "numbers");
    assert_eq!(generator.id(), "list");
    assert_eq!(generator.next_value(), "1 -2147483648 2147483647");
}

#[test]
fn builtin_list_types_use_the_default_item_count() {
    let schema = CompiledSchema::new("0.1");
    let index = SchemaIndex::new(&schema);
    let factory = GeneratorFactory::new(&index, 3, IdRegistry::shared());

    let mut generator = factory.builtin(Builtin::NmTokens, &Facets::default(), 0);
    generator.set_prefix("tag");
    assert_eq!(generator.next_value(), "tag1 tag2 tag3");
}

#[test]
fn ids_are_unique_and_references_point_at_them() {
    let schema = CompiledSchema::new("0.1");
    let index = SchemaIndex::new(&schema);
    let registry = IdRegistry::shared();
    let factory = GeneratorFactory::new(&index, 3, registry.clone());

    let mut orders = factory.builtin(Builtin::Id, &Facets::default(), 0);
    orders.set_prefix("order");
    let mut lines = factory.builtin(Builtin::Id, &Facets::default(), 0);
    lines.set_prefix("line");
    let mut refs = factory.builtin(Builtin::IdRef, &Facets::default(), 0);
    refs.set_prefix("ref");

    let issued = vec![orders.next_value(), lines.next_value(), orders.next_value()];
    assert_eq!(issued, ["order1", "line2", "order3"]);
    assert_eq!(take(&mut refs, 4), ["order1", "line2", "order3", "order1"]);
    assert_eq!(registry.borrow().issued(), issued.as_slice());
}

#[test]
fn dates_stay_inside_their_bounds() {
    let schema = CompiledSchema::new("0.1");
    let index = SchemaIndex::new(&schema);
    let factory = GeneratorFactory::new(&index, 3, IdRegistry::shared());
    let facets = Facets {
        min_inclusive: Some("2024-01-01".to_string()),
        max_inclusive: Some("2024-01-31".to_string()),
        ..Facets::default()
    };

    let mut generator = factory.builtin(Builtin::Date, &facets, 0);
    assert_eq!(generator.id(), "temporal.date");
    let values = take(&mut generator, 30);
    assert_eq!(values[0], "2024-01-01");
    assert!(values.iter().any(|value| value == "2024-01-31"));
    for value in &values {
        assert_eq!(value.len(), 10);
        assert!(value.as_str() >= "2024-01-01" && value.as_str() <= "2024-01-31");
    }
}

#[test]
fn hex_binary_length_counts_octets() {
    let schema = CompiledSchema::new("0.1");
    let index = SchemaIndex::new(&schema);
    let factory = GeneratorFactory::new(&index, 3, IdRegistry::shared());
    let facets = Facets {
        length: Some(3),
        ..Facets::default()
    };

    let mut generator = factory.builtin(Builtin::HexBinary, &facets, 0);
    for value in take(&mut generator, 8) {
        assert_eq!(value.len(), 6);
        assert!(value.chars().all(|c| c.is_ascii_hexdigit()));
    }
}

fn builtin_values(builtin: Builtin, facets: &Facets, count: usize) -> Vec<String> {
    let schema = CompiledSchema::new("0.1");
    let index = SchemaIndex::new(&schema);
    let factory = GeneratorFactory::new(&index, 3, IdRegistry::shared());
    let mut generator = factory.builtin(builtin, facets, 0);
    take(&mut generator, count)
}

/// Digits counted by `totalDigits`: leading integer zeros and trailing
/// fraction zeros are not significant.
fn significant_digits(value: &str) -> usize {
    let unsigned = value.trim_start_matches('-');
    let (integer, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    integer.trim_start_matches('0').len() + fraction.trim_end_matches('0').len()
}

#[test]
fn decimal_bounds_are_rounded_inward_to_fraction_digits() {
    let facets = Facets {
        min_inclusive: Some("1.231".to_string()),
        max_inclusive: Some("5.239".to_string()),
        fraction_digits: Some(2),
        ..Facets::default()
    };

    let values = builtin_values(Builtin::Decimal, &facets, 40);
    assert_eq!(values[..4], ["1.24", "5.23", "2.24", "4.23"]);
    for value in &values {
        let parsed: f64 = value.parse().expect("decimal literal");
        assert!((1.231..=5.239).contains(&parsed), "{value} out of range");
        let fraction = value.split('.').nth(1).unwrap_or("");
        assert!(fraction.len() <= 2, "{value} has too many fraction digits");
    }
}

#[test]
fn decimal_total_digits_include_fraction_digits_of_the_bounds() {
    let facets = Facets {
        min_inclusive: Some("0.123".to_string()),
        total_digits: Some(3),
        ..Facets::default()
    };

    let values = builtin_values(Builtin::Decimal, &facets, 40);
    assert_eq!(values[..4], ["0.123", "0.999", "0.124", "0.998"]);
    for value in &values {
        assert!(significant_digits(value) <= 3, "{value} has too many digits");
        let parsed: f64 = value.parse().expect("decimal literal");
        assert!(parsed >= 0.123, "{value} below the minimum");
    }
}

#[test]
fn float_exclusive_lower_bound_is_never_produced() {
    let facets = Facets {
        min_exclusive: Some("0".to_string()),
        max_inclusive: Some("1.5".to_string()),
        ..Facets::default()
    };

    let values = builtin_values(Builtin::Float, &facets, 30);
    let first: f64 = values[0].parse().expect("float literal");
    assert!(first > 0.0 && first < 1e-6, "{} is not just above zero", values[0]);
    assert_eq!(values[1], "1.5");
    for value in &values {
        let parsed: f64 = value.parse().expect("float literal");
        assert!(parsed > 0.0 && parsed <= 1.5, "{value} out of range");
    }
}

#[test]
fn time_steps_by_minutes_inside_its_bounds() {
    let facets = Facets {
        min_inclusive: Some("09:30:00".to_string()),
        max_exclusive: Some("10:00:00".to_string()),
        ..Facets::default()
    };

    let values = builtin_values(Builtin::Time, &facets, 30);
    assert_eq!(values[..4], ["09:30:00", "09:59:59", "09:31:00", "09:58:59"]);
    for value in &values {
        assert!(value.as_str() >= "09:30:00" && value.as_str() <= "09:59:59", "{value}");
    }
}

#[test]
fn g_year_walks_whole_years() {
    let facets = Facets {
        min_inclusive: Some("2000".to_string()),
        max_inclusive: Some("2003".to_string()),
        ..Facets::default()
    };

    let values = builtin_values(Builtin::GYear, &facets, 20);
    assert_eq!(values[..3], ["2000", "2003", "2001"]);
    for value in &values {
        let year: i32 = value.parse().expect("year literal");
        assert!((2000..=2003).contains(&year), "{value} out of range");
    }
}

#[test]
fn date_time_keeps_fractional_seconds_of_its_bound() {
    let facets = Facets {
        min_inclusive: Some("2024-01-01T00:00:00.5".to_string()),
        ..Facets::default()
    };

    let values = builtin_values(Builtin::DateTime, &facets, 12);
    assert_eq!(values[0], "2024-01-01T00:00:00.500");
    assert_eq!(values[1], "9999-12-31T23:59:59");
    assert_eq!(values[2], "2024-01-02T00:00:00.500");
    for value in &values {
        assert!(value.as_str() >= "2024-01-01T00:00:00.5", "{value} below the minimum");
    }
}

#[test]
fn duration_keeps_fractional_seconds_of_its_bounds() {
    let facets = Facets {
        min_inclusive: Some("PT1.5S".to_string()),
        max_inclusive: Some("PT3.5S".to_string()),
        ..Facets::default()
    };

    let values = builtin_values(Builtin::Duration, &facets, 6);
    assert_eq!(
        values,
        ["PT1.5S", "PT3.5S", "PT2.5S", "PT2.5S", "PT3.5S", "PT1.5S"]
    );
}

#[test]
fn exact_length_keeps_trailing_counter_digits() {
    let single = Facets {
        length: Some(1),
        ..Facets::default()
    };
    let mut generator = ValueGenerator::Text(TextGenerator::plain(&single));
    generator.set_prefix("code");
    assert_eq!(
        take(&mut generator, 12),
        ["1", "2", "3", "4", "5", "6", "7", "8", "9", "0", "1", "2"]
    );

    let pair = Facets {
        length: Some(2),
        ..Facets::default()
    };
    let mut generator = ValueGenerator::Text(TextGenerator::plain(&pair));
    generator.set_prefix("code");
    let values = take(&mut generator, 11);
    assert_eq!(values[0], "c1");
    assert_eq!(values[8], "c9");
    assert_eq!(values[9..], ["10", "11"]);
}
