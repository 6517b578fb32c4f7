use expect_test::expect;
use turin_check::Compilation;
use turin_resolve::{EmptyPlatformResolver, PlatformResolver, SymbolResolver};
use turin_source::{CompilerConfig, Position};
use turin_syntax::{
    ActualParam, Cardinality, Expression, FileMember, Program, PropertyDefinition, PropertyReference, QualifiedName,
    RelationDefinition, RelationFieldDefinition, Statement, TurinFile, TypeAnnotation, TypeDefinition, TypeMember,
};

fn line(n: u32) -> Position {
    Position::create(n, 0, n, 20)
}

fn namespace(name: &str) -> QualifiedName {
    QualifiedName::parse(name).unwrap()
}

/// A well formed file: `int x`, `type T { x }` and a program printing `x`.
fn valid_file() -> TurinFile {
    let t = TypeDefinition::new("T", vec![TypeMember::PropertyReference(PropertyReference::new("x"))]);
    let main = Program::new(
        "Main",
        Statement::block(vec![Statement::var(
            "copy",
            Expression::value_ref("x"),
            Some(TypeAnnotation::primitive("int")),
        )]),
        "args",
    );
    TurinFile::new(
        namespace("pkg"),
        vec![],
        vec![
            FileMember::Property(PropertyDefinition::new("x", TypeAnnotation::primitive("int"))),
            FileMember::Type(t),
            FileMember::Program(main),
        ],
    )
}

/// Diagnostics are recorded relation first, but the relation comes last in
/// the source.
fn invalid_file() -> TurinFile {
    let relation = RelationDefinition::new(
        "Lonely",
        vec![RelationFieldDefinition::new(
            "only",
            TypeAnnotation::reference("String"),
            Cardinality::Many,
        )],
    )
    .at(line(9));
    let main = Program::new(
        "Check",
        Statement::block(vec![
            Statement::expression(Expression::call(
                Expression::value_ref("undefined"),
                vec![ActualParam::positional(Expression::int(1))],
            ))
            .at(line(2)),
            Statement::if_else(Expression::int(0), Statement::block(vec![]), vec![], None).at(line(3)),
        ]),
        "args",
    );
    TurinFile::new(
        namespace("other"),
        vec![],
        vec![FileMember::Relation(relation), FileMember::Program(main)],
    )
}

fn config(parallel: bool) -> CompilerConfig {
    let mut config = CompilerConfig::default();
    config.package.name = "demo".to_string();
    config.validation.parallel = parallel;
    config
}

#[test]
fn test_valid_batch_is_ready_for_codegen() {
    let files = vec![valid_file()];
    let compilation = Compilation::with_outer(config(false), &files, Box::new(PlatformResolver::java_lang()));
    let batch = compilation.check();

    assert!(batch.ready_for_codegen());
    assert_eq!(batch.error_count(), 0);
    let input = batch.into_codegen_input().unwrap();
    assert_eq!(input.len(), 1);
}

#[test]
fn test_diagnostics_block_codegen() {
    let files = vec![valid_file(), invalid_file()];
    let compilation = Compilation::with_outer(config(false), &files, Box::new(EmptyPlatformResolver));
    let batch = compilation.check();

    assert!(!batch.ready_for_codegen());
    assert!(batch.diagnostics_for(0).is_empty());
    let err = batch.into_codegen_input().unwrap_err();
    // Without the platform `String` is unknown as well
    assert_eq!(err.count, 4);
    assert_eq!(err.to_string(), "4 semantic error(s) found, code generation skipped");
}

#[test]
fn test_diagnostics_are_sorted_by_position() {
    let files = vec![invalid_file()];
    let compilation = Compilation::with_outer(config(false), &files, Box::new(PlatformResolver::java_lang()));
    let batch = compilation.check();

    let rendered: String = batch
        .diagnostics()
        .map(|d| format!("{}: {}\n", d.position.map(|p| p.to_string()).unwrap_or_default(), d.message))
        .collect();
    expect![[r#"
        2:0-2:20: Unsolved method `undefined`
        3:0-3:20: Expected a boolean condition for `if`, found `int`
        9:0-9:20: Each relation should have exactly 2 fields
    "#]]
    .assert_eq(&rendered);
}

#[test]
fn test_parallel_validation_matches_sequential() {
    let files = vec![invalid_file(), valid_file(), invalid_file()];

    let sequential = Compilation::with_outer(config(false), &files, Box::new(PlatformResolver::java_lang())).check();
    let parallel = Compilation::with_outer(config(true), &files, Box::new(PlatformResolver::java_lang())).check();

    for index in 0..files.len() {
        assert_eq!(sequential.diagnostics_for(index), parallel.diagnostics_for(index));
    }
    assert_eq!(parallel.error_count(), sequential.error_count());
}

#[test]
fn test_without_outer_resolver_platform_names_are_unknown() {
    let files = vec![invalid_file()];
    let compilation = Compilation::new(config(false), &files);
    let batch = compilation.check();

    let messages: Vec<&str> = batch.diagnostics().map(|d| d.message.as_str()).collect();
    assert!(messages.contains(&"Unknown type `String`"));
    assert!(compilation.resolver().outer().is_none());
}

#[test]
fn test_reports_carry_source_spans() {
    let files = vec![invalid_file()];
    let compilation = Compilation::with_outer(config(false), &files, Box::new(PlatformResolver::java_lang()));
    let batch = compilation.check();

    let source = "program Check(String[] args) {\n  undefined(1)\n  if 0 {}\n}\n";
    let reports = batch.reports(0, "other.to", source);
    assert_eq!(reports.len(), 3);
    assert_eq!(reports[0].location, "other.to");
    assert_eq!(reports[0].to_string(), "Unsolved method `undefined`");
}
