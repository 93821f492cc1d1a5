use std::thread;

use cumin::{
    Curry, CuminError, FloatKind, Handler, IntoValue, Kind, Param, Registry, Returns, Signature,
    TypeDescriptor, Value,
};

/// Share of a whole, accepted as a fraction, a number of percent, or "N%".
#[derive(Debug, Clone, Copy, PartialEq)]
struct Ratio(f64);

fn to_ratio(value: &Value) -> Result<Value, String> {
    let ratio = match value {
        Value::Float(v) if (0.0..=1.0).contains(v) => *v,
        Value::Float(v) => *v / 100.0,
        Value::Int(v) => *v as f64 / 100.0,
        Value::String(s) => {
            let digits = s.strip_suffix('%').ok_or("missing %")?;
            digits.parse::<f64>().map_err(|e| e.to_string())? / 100.0
        }
        other => return Err(format!("no ratio in {}", other.type_name())),
    };
    if (0.0..=1.0).contains(&ratio) {
        Ok(Value::Float(ratio))
    } else {
        Err(format!("{ratio} is not a ratio"))
    }
}

impl Param for Ratio {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new("Ratio", Kind::Float(FloatKind::F64))
            .with_converter(to_ratio)
    }

    fn from_value(value: Value) -> Option<Self> {
        value.as_f64().map(Ratio)
    }
}

impl IntoValue for Ratio {
    fn descriptor() -> TypeDescriptor {
        <Ratio as Param>::descriptor()
    }

    fn into_value(self) -> Value {
        Value::Float(self.0)
    }
}

impl Returns for Ratio {
    fn descriptors() -> Vec<TypeDescriptor> {
        vec![<Ratio as IntoValue>::descriptor()]
    }

    fn into_raw(self) -> Vec<Value> {
        vec![self.into_value()]
    }
}

fn apply(price: f64, discount: Ratio) -> f64 {
    price * (1.0 - discount.0)
}

fn square(x: i64) -> i64 {
    x * x
}

fn checked_sqrt(x: f64) -> Result<f64, String> {
    if x < 0.0 {
        Err(format!("cannot take the root of {x}"))
    } else {
        Ok(x.sqrt())
    }
}

#[test]
fn wrapper_caches_name_and_signature() {
    let curry = Curry::from_fn(square).unwrap();
    assert_eq!(curry.name(), "square");
    assert_eq!(curry.arity(), 1);
    assert_eq!(curry.signature().to_string(), "fn(i64) -> i64");
    assert_eq!(curry.handler().path(), Some("curry_tests::square"));
}

#[test]
fn custom_converter_decides_the_argument() {
    let curry = Curry::from_fn(apply).unwrap();
    assert_eq!(curry.signature().to_string(), "fn(f64, Ratio) -> f64");

    for discount in [
        Value::String("25%".into()),
        Value::Int(25),
        Value::Float(25.0),
        Value::Float(0.25),
    ] {
        assert_eq!(
            curry.invoke(&[Value::Float(80.0), discount]).unwrap(),
            vec![Value::Float(60.0)]
        );
    }

    let err = curry
        .invoke(&[Value::Float(80.0), Value::String("lots".into())])
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Cumin Type Error: expected Ratio for arg[1] in (fn(f64, Ratio) -> f64), got String."
    );
}

#[test]
fn custom_type_as_return_value() {
    let curry = Curry::from_fn(|whole: f64, part: f64| Ratio(part / whole)).unwrap();
    assert_eq!(curry.signature().to_string(), "fn(f64, f64) -> Ratio");
    assert_eq!(
        curry.invoke(&[Value::Int(4), Value::Int(1)]).unwrap(),
        vec![Value::Float(0.25)]
    );
}

#[test]
fn one_wrapper_serves_many_threads() {
    let curry = Curry::from_fn(square).unwrap();
    thread::scope(|scope| {
        let handles: Vec<_> = (0..8i64)
            .map(|i| {
                let curry = &curry;
                scope.spawn(move || curry.invoke(&[Value::Float(i as f64)]))
            })
            .collect();
        for (i, handle) in handles.into_iter().enumerate() {
            let i = i as i64;
            assert_eq!(handle.join().unwrap().unwrap(), vec![Value::Int(i * i)]);
        }
    });
}

#[test]
fn batch_results_keep_input_order() {
    let curry = Curry::from_fn(checked_sqrt).unwrap();
    let batch = vec![
        vec![Value::Int(9)],
        vec![Value::Float(-1.0)],
        vec![],
        vec![Value::Float(2.25)],
    ];
    let results = curry.invoke_batch(&batch);
    assert_eq!(results.len(), 4);
    assert_eq!(results[0], Ok(vec![Value::Float(3.0)]));
    assert_eq!(
        results[1],
        Err(CuminError::Invocation("cannot take the root of -1".to_string()))
    );
    assert!(matches!(results[2], Err(CuminError::ArityMismatch { .. })));
    assert_eq!(results[3], Ok(vec![Value::Float(1.5)]));
}

#[test]
fn invoke_json_reports_decode_errors() {
    let curry = Curry::from_fn(square).unwrap();
    assert_eq!(curry.invoke_json("[3]").unwrap(), vec![Value::Int(9)]);
    assert!(matches!(
        curry.invoke_json("[3").unwrap_err(),
        CuminError::Decode(_)
    ));
    assert!(matches!(
        curry.invoke_json("[3.5]").unwrap_err(),
        CuminError::TypeMismatch { index: 0, .. }
    ));
}

#[test]
fn registry_files_callables_by_name() {
    let mut registry = Registry::new();
    assert!(registry.is_empty());
    assert!(registry.register(Handler::new(square)).unwrap().is_none());
    registry
        .register_as("root", Handler::new(checked_sqrt))
        .unwrap();

    assert_eq!(registry.names(), vec!["root", "square"]);
    assert_eq!(registry.len(), 2);
    assert_eq!(
        registry.invoke("square", &[Value::Float(5.0)]).unwrap(),
        vec![Value::Int(25)]
    );
    assert_eq!(
        registry.invoke("root", &[Value::Int(16)]).unwrap(),
        vec![Value::Float(4.0)]
    );
    assert_eq!(
        registry.invoke("cube", &[Value::Int(2)]).unwrap_err(),
        CuminError::NotCallable
    );
}

#[test]
fn registering_twice_replaces_the_wrapper() {
    let mut registry = Registry::new();
    registry.register_as("f", Handler::new(square)).unwrap();
    let previous = registry
        .register_as("f", Handler::new(checked_sqrt))
        .unwrap()
        .unwrap();
    assert_eq!(previous.name(), "square");
    assert_eq!(registry.get("f").unwrap().name(), "checked_sqrt");
}

#[test]
fn registry_rejects_null_handlers() {
    let mut registry = Registry::new();
    assert_eq!(
        registry.register(Handler::null()).unwrap_err(),
        CuminError::NotCallable
    );
    assert!(registry.is_empty());
}

#[test]
fn raw_handlers_take_hand_written_signatures() {
    let signature = Signature::new(
        vec![<i64 as Param>::descriptor(), <i64 as Param>::descriptor()],
        vec![<i64 as Param>::descriptor(), TypeDescriptor::error()],
    );
    let handler = Handler::from_raw("ops::sub", signature, |args| {
        match (args[0].as_i64(), args[1].as_i64()) {
            (Some(a), Some(b)) if a >= b => Ok(vec![Value::Int(a - b), Value::Null]),
            _ => Ok(vec![Value::Null, Value::String("underflow".into())]),
        }
    });
    let curry = Curry::new(handler).unwrap();
    assert_eq!(curry.name(), "sub");
    assert_eq!(
        curry.invoke(&[Value::Float(5.0), Value::Int(3)]).unwrap(),
        vec![Value::Int(2)]
    );
    assert_eq!(
        curry.invoke(&[Value::Int(3), Value::Int(5)]).unwrap_err().to_string(),
        "underflow"
    );
}

#[test]
fn raw_signatures_may_name_their_own_types() {
    let float64 = TypeDescriptor::new("float64", Kind::Float(FloatKind::F64));
    let signature = Signature::new(vec![float64], vec![float64]);
    let handler = Handler::from_raw("ops::halve", signature, |args| {
        Ok(vec![Value::Float(args[0].as_f64().unwrap_or(f64::NAN) / 2.0)])
    });
    let curry = Curry::new(handler).unwrap();
    assert_eq!(curry.signature().to_string(), "fn(float64) -> float64");
    assert_eq!(curry.invoke(&[Value::Float(2.5)]).unwrap(), vec![Value::Float(1.25)]);
    assert_eq!(curry.invoke(&[Value::Int(3)]).unwrap(), vec![Value::Float(1.5)]);
}
