use std::{env, fs::read_to_string, process};

use rillc::{lexer::lexer::tokenize, parser::parser::parse, type_checker::type_checker::analyze};

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut dump_ast = false;
    let mut path = None;
    for arg in &args[1..] {
        if arg == "--dump-ast" {
            dump_ast = true;
        } else {
            path = Some(arg.clone());
        }
    }

    let path = match path {
        Some(path) => path,
        None => {
            eprintln!("usage: rillc [--dump-ast] <source.rill>");
            process::exit(2);
        }
    };

    let source = match read_to_string(&path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Error accessing the source file \"{}\": {}", path, err);
            process::exit(2);
        }
    };

    let tokens = tokenize(source);

    let mut ast = match parse(tokens) {
        Ok(ast) => ast,
        Err(error) => {
            println!("{}", error);
            process::exit(1);
        }
    };

    if dump_ast {
        print!("{}", ast.dump());
    }

    match analyze(&mut ast) {
        Ok(()) => println!("Rill program successfully checked."),
        Err(diagnostics) => {
            println!("{}", diagnostics);
            process::exit(1);
        }
    }
}
