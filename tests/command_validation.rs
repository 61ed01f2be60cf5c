//! Integration test: Command validation
//!
//! Arity, type and named-argument checks must fail deterministically and
//! never reach the command body.

use std::cell::Cell;
use std::rc::Rc;

use proptest::prelude::*;

use librus_terminal::command::{Command, CommandOutput, NamedArgs};
use librus_terminal::core::{CommandError, Value as ArgValue, ValueKind};

const NAMES: [&str; 6] = ["alpha", "beta", "gamma", "delta", "epsilon", "zeta"];

/// A command with `required` string parameters and one named int, counting calls
fn counting_command(required: usize) -> (Command, Rc<Cell<usize>>) {
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();

    let mut builder = Command::builder("sample").named("limit", ValueKind::Int, 10_i64);
    for name in &NAMES[..required] {
        builder = builder.positional(*name, ValueKind::Str);
    }
    let command = builder
        .build(move |_| {
            counter.set(counter.get() + 1);
            Ok(CommandOutput::silent())
        })
        .unwrap();

    (command, calls)
}

/// Session slot followed by `count` string options
fn args_with(count: usize) -> Vec<ArgValue> {
    let mut args = vec![ArgValue::Str("session".into())];
    args.extend((0..count).map(|i| ArgValue::Str(format!("opt{}", i))));
    args
}

fn arg_value() -> impl Strategy<Value = ArgValue> {
    prop_oneof![
        "[a-z]{0,8}".prop_map(ArgValue::Str),
        any::<i64>().prop_map(ArgValue::Int),
        any::<bool>().prop_map(ArgValue::Bool),
        (-1.0e6f64..1.0e6).prop_map(ArgValue::Float),
    ]
}

proptest! {
    #[test]
    fn too_few_lists_missing_trailing_names(
        (required, supplied) in (0usize..=6).prop_flat_map(|n| (Just(n), 0..=n))
            .prop_filter("need a shortfall", |(n, k)| k < n)
    ) {
        let (command, calls) = counting_command(required);

        let err = command.run(args_with(supplied), NamedArgs::new()).unwrap_err();

        let missing: Vec<String> = NAMES[supplied..required].iter().map(|s| s.to_string()).collect();
        prop_assert_eq!(err, CommandError::NotEnoughArguments { missing });
        prop_assert_eq!(calls.get(), 0);
    }

    #[test]
    fn too_many_is_rejected(required in 0usize..=6, extra in 1usize..4) {
        let (command, calls) = counting_command(required);

        let err = command.run(args_with(required + extra), NamedArgs::new()).unwrap_err();

        match err {
            CommandError::TooManyArguments { unexpected } => prop_assert_eq!(unexpected.len(), extra),
            other => prop_assert!(false, "unexpected fault {:?}", other),
        }
        prop_assert_eq!(calls.get(), 0);
    }

    #[test]
    fn first_mistyped_positional_is_reported(values in prop::collection::vec(arg_value(), 1..=6)) {
        let (command, calls) = counting_command(values.len());
        let mut args = vec![ArgValue::Str("session".into())];
        args.extend(values.iter().cloned());

        let result = command.run(args, NamedArgs::new());

        match values.iter().position(|v| v.kind() != ValueKind::Str) {
            Some(first_bad) => {
                let err = result.unwrap_err();
                prop_assert_eq!(err, CommandError::InvalidArgumentType {
                    index: first_bad + 1,
                    name: NAMES[first_bad].to_string(),
                    expected: ValueKind::Str,
                    passed: values[first_bad].kind(),
                });
                prop_assert_eq!(calls.get(), 0);
            }
            None => {
                prop_assert!(result.is_ok());
                prop_assert_eq!(calls.get(), 1);
            }
        }
    }

    #[test]
    fn unknown_named_rejected_whatever_the_value(key in "[a-k]{1,6}", value in arg_value()) {
        prop_assume!(key != "limit");
        let (command, calls) = counting_command(0);
        let mut kwargs = NamedArgs::new();
        kwargs.insert(key.clone(), value);

        let err = command.run(args_with(0), kwargs).unwrap_err();

        prop_assert_eq!(err, CommandError::UnknownNamedArgument { name: key });
        prop_assert_eq!(calls.get(), 0);
    }

    #[test]
    fn validation_is_idempotent(
        count in 0usize..8,
        key in "[a-z]{1,6}",
        value in arg_value(),
    ) {
        let (command, _) = counting_command(3);
        let args = args_with(count);
        let mut kwargs = NamedArgs::new();
        kwargs.insert(key, value);

        let first = (command.validate_positional(&args), command.validate_named(&kwargs));
        for _ in 0..3 {
            let again = (command.validate_positional(&args), command.validate_named(&kwargs));
            prop_assert_eq!(&again, &first);
        }
    }
}

#[test]
fn test_session_slot_is_not_type_checked() {
    let (command, calls) = counting_command(1);
    let args = vec![ArgValue::Int(42), ArgValue::Str("x".into())];

    assert!(command.run(args, NamedArgs::new()).is_ok());
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_named_bool_accepted_for_int() {
    let (command, calls) = counting_command(0);
    let mut kwargs = NamedArgs::new();
    kwargs.insert("limit".into(), ArgValue::Bool(true));

    assert!(command.run(args_with(0), kwargs).is_ok());
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_named_float_rejected_for_int() {
    let (command, calls) = counting_command(0);
    let mut kwargs = NamedArgs::new();
    kwargs.insert("limit".into(), ArgValue::Float(1.5));

    assert_eq!(
        command.run(args_with(0), kwargs),
        Err(CommandError::InvalidNamedArgumentType {
            name: "limit".into(),
            expected: ValueKind::Int,
            passed: ValueKind::Float,
        })
    );
    assert_eq!(calls.get(), 0);
}
