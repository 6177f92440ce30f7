//! Extra text printed after the generated help message.

pub const AFTER_HELP: &str = r#"EXAMPLES:
    rerun example.com/hello
    rerun example.com/server -addr :8080 -debug

Every argument after the import path is passed to the program, even those starting with a dash.

HOW IT WORKS:
    Every interval, rerun calls `go install -v <import path>`.
    If go printed something on stdout, the build failed and the errors are printed
    (only when they changed since the previous build).
    Otherwise, if go printed something on stderr, the program was rebuilt:
    the running instance is killed and the new binary is started.
    If go printed nothing, the installed binary was already up to date.

    Anything else go happens to write on stderr also counts as a rebuild.
    By default an up to date binary is not started until its first rebuild,
    use --always-start to start it right away.
"#;
