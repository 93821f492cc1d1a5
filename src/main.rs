use std::{env, process};

use cumin::{CuminError, Handler, Map, Registry, Value, runtime::json::encode_results};

fn add(a: i64, b: i64) -> Result<i64, String> {
    a.checked_add(b).ok_or_else(|| format!("{a} + {b} overflows i64"))
}

fn divide(a: f64, b: f64) -> Result<f64, String> {
    if b == 0.0 {
        return Err("division by zero".to_string());
    }
    Ok(a / b)
}

fn greet(name: String, times: u8) -> String {
    vec![format!("hello, {name}"); usize::from(times)].join("; ")
}

fn sum(items: Vec<Value>) -> Result<f64, String> {
    items.iter().try_fold(0.0, |acc, item| match item {
        Value::Int(v) => Ok(acc + *v as f64),
        Value::Float(v) => Ok(acc + v),
        other => Err(format!("cannot add {}", other)),
    })
}

fn receive(
    id: i64,
    label: String,
    weight: f64,
    tags: Vec<Value>,
    meta: Map,
) -> Result<String, String> {
    if label.is_empty() {
        return Err(format!("record {id} has no label"));
    }
    Ok(format!(
        "{label}#{id} weight={weight} tags={} meta={}",
        tags.len(),
        meta.len()
    ))
}

fn demo_registry() -> Result<Registry, CuminError> {
    let mut registry = Registry::new();
    registry.register(Handler::new(add))?;
    registry.register(Handler::new(divide))?;
    registry.register(Handler::new(greet))?;
    registry.register(Handler::new(sum))?;
    registry.register(Handler::new(receive))?;
    Ok(registry)
}

fn main() {
    let mut args: Vec<String> = env::args().collect();
    let verbose = args.iter().any(|arg| arg == "--verbose");
    let list = args.iter().any(|arg| arg == "--list");
    if verbose {
        args.retain(|arg| arg != "--verbose");
    }
    if list {
        args.retain(|arg| arg != "--list");
    }

    let registry = match demo_registry() {
        Ok(registry) => registry,
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    };

    if list {
        list_functions(&registry);
        return;
    }

    if args.len() < 2 {
        print_help();
        return;
    }

    match args[1].as_str() {
        "-h" | "--help" | "help" => print_help(),
        name => {
            let json = args.get(2).map(String::as_str).unwrap_or("[]");
            invoke(&registry, name, json, verbose);
        }
    }
}

fn invoke(registry: &Registry, name: &str, json: &str, verbose: bool) {
    let Some(curry) = registry.get(name) else {
        eprintln!("Error: unknown function: {}", name);
        eprintln!("Run `cumin --list` to see the available functions.");
        process::exit(1);
    };

    if verbose {
        eprintln!("{}: {}", curry.name(), curry.signature());
    }

    match curry.invoke_json(json) {
        Ok(results) => println!("{}", encode_results(&results)),
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    }
}

fn list_functions(registry: &Registry) {
    for name in registry.names() {
        if let Some(curry) = registry.get(name) {
            println!("{:<10} {}", name, curry.signature());
        }
    }
}

fn print_help() {
    println!(
        "\
Cumin CLI

Usage:
  cumin <function> [json-array]
  cumin --list

Examples:
  cumin add '[2, 3]'
  cumin divide '[1, 0]'
  cumin greet '[\"world\", 2]'

Flags:
  --list             List the demo functions and their signatures
  --verbose          Print the resolved signature before invoking
  -h, --help         Show this help message
"
    );
}
