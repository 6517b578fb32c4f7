use expect_test::{expect, Expect};
use turin_check::validate_file;
use turin_resolve::{PlatformResolver, SrcSymbolResolver};
use turin_source::{DiagnosticCollector, Position, ResolverOptions};
use turin_syntax::{
    ActualParam, Cardinality, CatchClause, ElifClause, Expression, FileMember, FormalParameter, FunctionDefinition,
    ImportDeclaration, ImportKind, MathOperator, Program, PropertyDefinition, PropertyReference, QualifiedName,
    RelationDefinition, RelationFieldDefinition, Statement, TurinFile, TypeAnnotation, TypeDefinition,
    TypeIdentifier, TypeMember,
};

fn line(n: u32) -> Position {
    Position::create(n, 0, n, 20)
}

fn namespace(name: &str) -> QualifiedName {
    QualifiedName::parse(name).unwrap()
}

fn program(statements: Vec<Statement>) -> FileMember {
    FileMember::Program(Program::new("Main", Statement::block(statements), "args"))
}

fn render(collector: &DiagnosticCollector) -> String {
    collector
        .diagnostics()
        .iter()
        .map(|d| match d.position {
            Some(position) => format!("{}: {}\n", position, d.message),
            None => format!("?: {}\n", d.message),
        })
        .collect()
}

/// Validates `files[0]` against the batch, with the `java.lang` platform
/// behind it.
fn check_first(files: &[TurinFile], expected: Expect) -> bool {
    let resolver =
        SrcSymbolResolver::with_outer(files, Box::new(PlatformResolver::java_lang()), ResolverOptions::default());
    let mut collector = DiagnosticCollector::new();
    let valid = validate_file(&files[0], &resolver, &mut collector);
    expected.assert_eq(&render(&collector));
    assert_eq!(valid, collector.is_empty());
    valid
}

/// Validates every file of the batch, rendering all diagnostics.
fn check_each(files: &[TurinFile]) -> String {
    let resolver =
        SrcSymbolResolver::with_outer(files, Box::new(PlatformResolver::java_lang()), ResolverOptions::default());
    let mut collector = DiagnosticCollector::new();
    for file in files {
        validate_file(file, &resolver, &mut collector);
    }
    render(&collector)
}

fn relation(name: &str, fields: Vec<RelationFieldDefinition>) -> FileMember {
    FileMember::Relation(RelationDefinition::new(name, fields))
}

fn relation_field(name: &str, target: &str, cardinality: Cardinality) -> RelationFieldDefinition {
    RelationFieldDefinition::new(name, TypeAnnotation::reference(target), cardinality)
}

#[test]
fn test_relation_with_one_field_reports_once() {
    let bad = RelationDefinition::new("Ownership", vec![relation_field("owner", "Person", Cardinality::Single)])
        .at(line(3));
    let files = vec![TurinFile::new(
        namespace("app"),
        vec![],
        vec![
            FileMember::Type(TypeDefinition::new("Person", vec![])),
            FileMember::Relation(bad),
        ],
    )];

    let valid = check_first(
        &files,
        expect![[r#"
            3:0-3:20: Each relation should have exactly 2 fields
        "#]],
    );
    assert!(!valid);
}

#[test]
fn test_relation_with_two_fields_is_valid() {
    let files = vec![TurinFile::new(
        namespace("app"),
        vec![],
        vec![
            FileMember::Type(TypeDefinition::new("Person", vec![])),
            FileMember::Type(TypeDefinition::new("Car", vec![])),
            relation(
                "Ownership",
                vec![
                    relation_field("owner", "Person", Cardinality::Single),
                    relation_field("cars", "Car", Cardinality::Many),
                ],
            ),
        ],
    )];

    assert!(check_first(&files, expect![[""]]));
}

#[test]
fn test_relation_field_targets_must_resolve() {
    let files = vec![TurinFile::new(
        namespace("app"),
        vec![],
        vec![relation(
            "Ownership",
            vec![
                RelationFieldDefinition::new("a", TypeAnnotation::reference("Ghost").at(line(2)), Cardinality::Single),
                relation_field("b", "String", Cardinality::Many),
                relation_field("c", "String", Cardinality::Many),
            ],
        )],
    )];

    check_first(
        &files,
        expect![[r#"
            ?: Each relation should have exactly 2 fields
            2:0-2:20: Unknown type `Ghost`
        "#]],
    );
}

#[test]
fn test_validation_does_not_stop_at_the_first_error() {
    let files = vec![TurinFile::new(
        namespace("app"),
        vec![],
        vec![program(vec![
            Statement::expression(Expression::value_ref("a")).at(line(2)),
            Statement::expression(Expression::value_ref("b")).at(line(3)),
            Statement::if_else(
                Expression::int(1),
                Statement::block(vec![Statement::expression(Expression::value_ref("c")).at(line(5))]),
                vec![],
                None,
            )
            .at(line(4)),
        ])],
    )];

    check_first(
        &files,
        expect![[r#"
            2:0-2:20: Unresolved symbol `a`
            3:0-3:20: Unresolved symbol `b`
            4:0-4:20: Expected a boolean condition for `if`, found `int`
            5:0-5:20: Unresolved symbol `c`
        "#]],
    );
}

#[test]
fn test_variables_are_visible_after_their_declaration() {
    let files = vec![TurinFile::new(
        namespace("app"),
        vec![],
        vec![program(vec![
            Statement::expression(Expression::value_ref("total")).at(line(2)),
            Statement::var("total", Expression::int(0), None).at(line(3)),
            Statement::expression(Expression::math(
                MathOperator::Sum,
                Expression::value_ref("total"),
                Expression::int(1),
            ))
            .at(line(4)),
            Statement::block(vec![Statement::var("inner", Expression::int(0), None)]),
            Statement::expression(Expression::value_ref("inner")).at(line(6)),
        ])],
    )];

    check_first(
        &files,
        expect![[r#"
            2:0-2:20: Unresolved symbol `total`
            6:0-6:20: Unresolved symbol `inner`
        "#]],
    );
}

#[test]
fn test_variable_declaration_assignability() {
    let files = vec![TurinFile::new(
        namespace("app"),
        vec![],
        vec![program(vec![
            Statement::var("a", Expression::int(1), Some(TypeAnnotation::primitive("double"))).at(line(2)),
            Statement::var("b", Expression::double(1.0), Some(TypeAnnotation::primitive("int"))).at(line(3)),
            Statement::var("c", Expression::string("s"), Some(TypeAnnotation::reference("Object"))).at(line(4)),
            Statement::var("d", Expression::int(1), Some(TypeAnnotation::reference("Nope").at(line(5)))).at(line(5)),
        ])],
    )];

    check_first(
        &files,
        expect![[r#"
            3:0-3:20: Cannot assign a value of type `double` to `b` of type `int`
            5:0-5:20: Unknown type `Nope`
        "#]],
    );
}

#[test]
fn test_program_argument_is_a_string_array() {
    let files = vec![TurinFile::new(
        namespace("app"),
        vec![],
        vec![program(vec![
            Statement::var(
                "first",
                Expression::array_access(Expression::value_ref("args"), Expression::int(0)),
                Some(TypeAnnotation::primitive("string")),
            )
            .at(line(2)),
            Statement::var("n", Expression::value_ref("args"), Some(TypeAnnotation::primitive("int"))).at(line(3)),
        ])],
    )];

    check_first(
        &files,
        expect![[r#"
            3:0-3:20: Cannot assign a value of type `java.lang.String[]` to `n` of type `int`
        "#]],
    );
}

#[test]
fn test_elif_conditions_are_checked() {
    let files = vec![TurinFile::new(
        namespace("app"),
        vec![],
        vec![program(vec![Statement::if_else(
            Expression::boolean(true),
            Statement::block(vec![]),
            vec![
                ElifClause::new(Expression::boolean(false), Statement::block(vec![])).at(line(3)),
                ElifClause::new(Expression::string("yes"), Statement::block(vec![])).at(line(4)),
            ],
            Some(Statement::block(vec![])),
        )
        .at(line(2))])],
    )];

    check_first(
        &files,
        expect![[r#"
            4:0-4:20: Expected a boolean condition for `elif`, found `java.lang.String`
        "#]],
    );
}

#[test]
fn test_function_bodies_see_parameters_and_return_type() {
    let good = FunctionDefinition::new(
        "half",
        TypeAnnotation::primitive("double"),
        vec![FormalParameter::new(TypeAnnotation::primitive("int"), "n")],
        Statement::block(vec![Statement::ret(Some(Expression::math(
            MathOperator::Division,
            Expression::value_ref("n"),
            Expression::double(2.0),
        )))
        .at(line(2))]),
    );
    let bad = FunctionDefinition::new(
        "name",
        TypeAnnotation::primitive("int"),
        vec![],
        Statement::block(vec![
            Statement::ret(Some(Expression::string("x"))).at(line(5)),
            Statement::ret(None).at(line(6)),
        ]),
    );
    let files = vec![TurinFile::new(
        namespace("app"),
        vec![],
        vec![FileMember::Function(good), FileMember::Function(bad)],
    )];

    check_first(
        &files,
        expect![[r#"
            5:0-5:20: Cannot return a value of type `java.lang.String` where `int` is expected
            6:0-6:20: Missing return value of type `int`
        "#]],
    );
}

#[test]
fn test_throw_and_catch_need_throwables() {
    let body = Statement::try_catch(
        Statement::block(vec![
            Statement::throw(Expression::creation("IllegalStateException", vec![])).at(line(2)),
            Statement::throw(Expression::string("oops")).at(line(3)),
        ]),
        vec![
            CatchClause::new(
                TypeIdentifier::simple("Exception"),
                "e",
                Statement::block(vec![Statement::expression(Expression::method_call(
                    Expression::value_ref("e"),
                    "getMessage",
                    vec![],
                ))
                .at(line(5))]),
            )
            .at(line(4)),
            CatchClause::new(TypeIdentifier::simple("String"), "s", Statement::block(vec![])).at(line(6)),
        ],
    );
    let files = vec![TurinFile::new(namespace("app"), vec![], vec![program(vec![body])])];

    check_first(
        &files,
        expect![[r#"
            3:0-3:20: Only subtypes of java.lang.Throwable can be thrown, found `java.lang.String`
            6:0-6:20: Only subtypes of java.lang.Throwable can be caught, found `java.lang.String`
        "#]],
    );
}

#[test]
fn test_imports() {
    let imports = vec![
        ImportDeclaration::new(ImportKind::Type {
            package: namespace("java.lang"),
            type_name: "Math".into(),
            alias: None,
        })
        .at(line(1)),
        ImportDeclaration::new(ImportKind::AllPackage {
            package: namespace("java.lang"),
        })
        .at(line(2)),
        ImportDeclaration::new(ImportKind::AllPackage {
            package: namespace("lib"),
        })
        .at(line(3)),
        ImportDeclaration::new(ImportKind::Type {
            package: namespace("lib"),
            type_name: "Missing".into(),
            alias: None,
        })
        .at(line(4)),
        ImportDeclaration::new(ImportKind::SingleField {
            package: namespace("java.lang"),
            type_name: "Math".into(),
            field: "PI".into(),
            alias: None,
        })
        .at(line(5)),
    ];
    let app = TurinFile::new(namespace("app"), imports, vec![]);
    let lib = TurinFile::new(namespace("lib"), vec![], vec![]);
    let files = vec![app, lib];

    // Package lookup stays within the batch unless delegation is enabled
    check_first(
        &files,
        expect![[r#"
            2:0-2:20: Package `java.lang` does not exist
            4:0-4:20: Cannot find type `lib.Missing`
        "#]],
    );

    let delegating = SrcSymbolResolver::with_outer(
        &files,
        Box::new(PlatformResolver::java_lang()),
        ResolverOptions {
            delegate_package_lookup: true,
        },
    );
    let mut collector = DiagnosticCollector::new();
    validate_file(&files[0], &delegating, &mut collector);
    expect![[r#"
        4:0-4:20: Cannot find type `lib.Missing`
    "#]]
    .assert_eq(&render(&collector));
}

#[test]
fn test_type_members() {
    let t = TypeDefinition::new(
        "T",
        vec![
            TypeMember::PropertyReference(PropertyReference::new("x")),
            TypeMember::PropertyReference(PropertyReference::new("y").at(line(3))),
            TypeMember::Property(PropertyDefinition::new("x", TypeAnnotation::primitive("int")).at(line(4))),
        ],
    );
    let files = vec![TurinFile::new(
        namespace("app"),
        vec![],
        vec![
            FileMember::Property(PropertyDefinition::new("x", TypeAnnotation::primitive("int"))),
            FileMember::Type(t),
        ],
    )];

    check_first(
        &files,
        expect![[r#"
            3:0-3:20: Cannot find property `app.y`
            4:0-4:20: Duplicate member `x` in type `app.T`
        "#]],
    );
}

#[test]
fn test_duplicate_definitions_across_files() {
    let first = TurinFile::new(
        namespace("app"),
        vec![],
        vec![FileMember::Type(TypeDefinition::new("Point", vec![]))],
    );
    let second = TurinFile::new(
        namespace("app"),
        vec![],
        vec![FileMember::Property(
            PropertyDefinition::new("Point", TypeAnnotation::primitive("int")).at(line(7)),
        )],
    );
    let files = vec![second, first];

    // The type owns the name wherever its file sits in the batch
    expect![[r#"
        7:0-7:20: Duplicate definition of `app.Point`
    "#]]
    .assert_eq(&check_each(&files));

    let swapped: Vec<TurinFile> = files.into_iter().rev().collect();
    expect![[r#"
        7:0-7:20: Duplicate definition of `app.Point`
    "#]]
    .assert_eq(&check_each(&swapped));
}

#[test]
fn test_duplicates_of_one_kind_report_later_declarations() {
    let files = vec![
        TurinFile::new(
            namespace("app"),
            vec![],
            vec![FileMember::Property(
                PropertyDefinition::new("size", TypeAnnotation::primitive("int")).at(line(2)),
            )],
        ),
        TurinFile::new(
            namespace("app"),
            vec![],
            vec![FileMember::Property(
                PropertyDefinition::new("size", TypeAnnotation::primitive("long")).at(line(9)),
            )],
        ),
    ];

    expect![[r#"
        9:0-9:20: Duplicate definition of `app.size`
    "#]]
    .assert_eq(&check_each(&files));
}

#[test]
fn test_calls_in_statements() {
    let files = vec![TurinFile::new(
        namespace("app"),
        vec![],
        vec![program(vec![
            Statement::expression(Expression::call(
                Expression::value_ref("undefined"),
                vec![ActualParam::positional(Expression::int(1))],
            ))
            .at(line(2)),
            Statement::expression(Expression::method_call(
                Expression::static_field(TypeIdentifier::simple("System"), "out"),
                "println",
                vec![ActualParam::positional(Expression::value_ref("args"))],
            ))
            .at(line(3)),
        ])],
    )];

    check_first(
        &files,
        expect![[r#"
            2:0-2:20: Unsolved method `undefined`
        "#]],
    );
}
