use bitf_core::{BitHandler, FlagRegistry};
use bitf_query::*;
use proptest::prelude::*;

fn registry() -> FlagRegistry {
    FlagRegistry::new(["FLAG_0", "FLAG_1", "FLAG_2", "FLAG_3"]).unwrap()
}

#[test]
fn flag_1_set_and_clear() {
    let builder = QueryPredicateBuilder::new("flags");
    let flag_1 = Operand::named(&registry(), "FLAG_1").unwrap();

    assert_eq!(builder.is_set(flag_1).inline(), r#"("flags" & 2) = 2"#);
    assert_eq!(builder.is_clear(flag_1).inline(), r#"("flags" & 2) = 0"#);
}

#[test]
fn exact_lookup_follows_operand() {
    let registry = registry();
    let builder = QueryPredicateBuilder::new("flags").with_table("T0");

    let on = builder.lookup(LookupKind::Exact, registry.bit("FLAG_0").unwrap()).unwrap();
    assert_eq!(on.inline(), r#"("T0"."flags" & 1) = 1"#);

    let off = builder.lookup(LookupKind::Exact, !registry.bit("FLAG_0").unwrap()).unwrap();
    assert_eq!(off.inline(), r#"("T0"."flags" & 1) = 0"#);

    let whole = builder.lookup(LookupKind::Exact, 15_i64).unwrap();
    assert_eq!(whole.sql(), r#""T0"."flags" = %s"#);
    assert_eq!(whole.params(), [15]);
}

#[test]
fn handler_operand_uses_its_value() {
    let handler = BitHandler::from_names(["FLAG_1", "FLAG_3"], registry()).unwrap();
    let builder = QueryPredicateBuilder::new("flags");

    assert_eq!(builder.set_update(&handler).inline(), r#""flags" | 10"#);
    assert_eq!(builder.is_set(&handler).inline(), r#"("flags" & 10) = 10"#);
}

#[test]
fn updates_per_dialect() {
    let registry = registry();
    let flag_2 = registry.bit("FLAG_2").unwrap();

    let generic = QueryPredicateBuilder::new("flags");
    assert_eq!(generic.clear_update(flag_2).inline(), r#""flags" & ~4"#);
    assert_eq!(generic.toggle_update(flag_2).unwrap().inline(), r#""flags" ^ 4"#);

    let postgres = generic.clone().with_dialect(Dialect::from_engine("django.db.backends.postgresql"));
    assert_eq!(postgres.toggle_update(flag_2).unwrap().inline(), r#""flags" # 4"#);

    let mysql = QueryPredicateBuilder::new("flags").with_dialect(Dialect::MySql);
    assert_eq!(mysql.toggle_update(flag_2).unwrap().inline(), "`flags` ^ 4");

    let sqlite = generic.with_dialect(Dialect::Sqlite);
    assert!(matches!(sqlite.toggle_update(flag_2), Err(QueryError::UnsupportedDialect { .. })));
    assert_eq!(sqlite.clear_update(flag_2).inline(), r#""flags" & ~4"#);
}

#[test]
fn unknown_flag_is_a_flag_error() {
    let err = Operand::named(&registry(), "FLAG_9").unwrap_err();
    assert!(matches!(err, QueryError::Flag { .. }));
    assert_eq!(err.kind(), "Flag");

    let mask = Operand::names(&registry(), ["FLAG_0", "FLAG_3"]).unwrap();
    assert_eq!(mask, Operand::Mask(9));
}

#[test]
fn fragment_serializes_with_params() {
    let fragment = QueryPredicateBuilder::new("flags").is_clear(4_i64);
    let json = serde_json::to_value(&fragment).unwrap();
    assert_eq!(json["params"], serde_json::json!([4]));
    assert_eq!(json["sql"], r#"("flags" & %s) = 0"#);
}

proptest! {
    #[test]
    fn inline_leaves_no_placeholder(mask in 0..=i64::MAX) {
        let builder = QueryPredicateBuilder::new("flags");
        for fragment in [builder.is_set(mask), builder.is_clear(mask), builder.set_update(mask)] {
            let inline = fragment.inline();
            prop_assert!(!inline.contains(PLACEHOLDER));
            prop_assert!(inline.contains(&mask.to_string()));
        }
    }
}
