use prop_hoist::hoist::ast::*;
use prop_hoist::hoist::codegen::emit;
use prop_hoist::hoist::resolver::TableResolver;
use prop_hoist::hoist::{transform, HoistPass, Options};

fn key_value(key: &str, value: Expr) -> ObjectMember {
    ObjectMember::KeyValue {
        key: PropKey::Ident {
            name: key.to_string(),
        },
        value,
    }
}

fn object(members: Vec<ObjectMember>) -> Expr {
    Expr::Object { members }
}

fn element(name: &str, attrs: Vec<(&str, Expr)>, children: Vec<JsxChild>) -> JsxElement {
    JsxElement {
        name: Ident::new(name),
        attrs: attrs
            .into_iter()
            .map(|(name, expr)| JsxAttr::Attr {
                name: name.to_string(),
                value: Some(JsxAttrValue::Expr { expr }),
            })
            .collect(),
        children,
    }
}

fn arrow(params: &[&str], body: Expr) -> Expr {
    Expr::Arrow(Function {
        name: None,
        params: params
            .iter()
            .map(|p| Pattern::Ident(Ident::new(p)))
            .collect(),
        body: FunctionBody::Expr {
            expr: Box::new(body),
        },
    })
}

fn const_decl(name: &str, init: Expr) -> Stmt {
    Stmt::Var(VarDecl {
        kind: VarKind::Const,
        declarators: vec![Declarator {
            pattern: Pattern::Ident(Ident::new(name)),
            init: Some(init),
        }],
        exported: false,
    })
}

fn component(name: &str, params: &[&str], body: Expr) -> Module {
    Module {
        body: vec![const_decl(name, arrow(params, body))],
    }
}

fn resolver() -> TableResolver {
    TableResolver::new()
        .with("tokens", Declaration::ImportBinding)
        .with("SPACING", Declaration::ModuleScopeConstant)
        .with("props", Declaration::Parameter)
        .with("count", Declaration::LocalVariable)
}

#[test]
fn test_scenario_object_literal_in_render_function() {
    let module = component(
        "Xyz",
        &[],
        Expr::Jsx(element(
            "Comp",
            vec![(
                "css",
                object(vec![
                    key_value("background", Expr::str("red")),
                    key_value("width", Expr::num(1.0)),
                ]),
            )],
            Vec::new(),
        )),
    );

    let out = transform(module, &Options::default(), &resolver());
    assert_eq!(
        emit(&out),
        "const Xyz = () => <Comp css={__$hoisted_o0} />;\n\
         const __$hoisted_o0 = { background: 'red', width: 1 };\n"
    );
}

#[test]
fn test_local_and_parameter_identifiers_are_never_hoisted() {
    for name in ["props", "count", "unknown"] {
        let module = component(
            "Xyz",
            &[],
            Expr::Jsx(element(
                "Comp",
                vec![(
                    "css",
                    object(vec![key_value(
                        "margin",
                        Expr::Binary {
                            op: BinaryOp::Add,
                            left: Box::new(Expr::ident(name)),
                            right: Box::new(Expr::str("px")),
                        },
                    )]),
                )],
                Vec::new(),
            )),
        );

        let out = HoistPass::default().run(module.clone(), &resolver());
        assert!(out.hoisted.is_empty(), "{} must block hoisting", name);
        assert_eq!(out.module, module);
    }
}

#[test]
fn test_names_follow_encounter_order() {
    // <A css={..0}><B css={..1} /><C css={..2} /></A>
    let child = |name: &str, n: f64| {
        JsxChild::Element(element(
            name,
            vec![("css", object(vec![key_value("n", Expr::num(n))]))],
            Vec::new(),
        ))
    };
    let module = component(
        "Xyz",
        &[],
        Expr::Jsx(element(
            "A",
            vec![("css", object(vec![key_value("n", Expr::num(0.0))]))],
            vec![child("B", 1.0), child("C", 2.0)],
        )),
    );

    let out = HoistPass::default().run(module, &resolver());
    assert_eq!(
        out.hoisted,
        vec!["__$hoisted_o0", "__$hoisted_o1", "__$hoisted_o2"]
    );

    let code = emit(&out.module);
    let tail: Vec<&str> = code.lines().skip(1).collect();
    assert_eq!(
        tail,
        vec![
            "const __$hoisted_o0 = { n: 0 };",
            "const __$hoisted_o1 = { n: 1 };",
            "const __$hoisted_o2 = { n: 2 };",
        ]
    );
}

#[test]
fn test_nested_literal_is_not_hoisted_twice() {
    let inner = object(vec![key_value("top", Expr::num(5.0))]);
    let outer = object(vec![key_value("margin", inner.clone())]);
    let module = component(
        "Xyz",
        &[],
        Expr::Jsx(element("Comp", vec![("css", outer.clone())], Vec::new())),
    );

    let out = HoistPass::default().run(module, &resolver());
    assert_eq!(out.hoisted.len(), 1);
    match out.module.body.last() {
        Some(Stmt::Var(var)) => assert_eq!(var.declarators[0].init, Some(outer)),
        other => panic!("expected hoisted declaration, got {:?}", other),
    }
}

#[test]
fn test_ternary_fan_out_leaves_condition() {
    let test = Expr::Binary {
        op: BinaryOp::StrictEq,
        left: Box::new(Expr::ident("props")),
        right: Box::new(Expr::str("dark")),
    };
    let module = component(
        "Xyz",
        &["props"],
        Expr::Jsx(element(
            "Comp",
            vec![(
                "css",
                Expr::Conditional {
                    test: Box::new(test),
                    consequent: Box::new(object(vec![key_value("color", Expr::str("black"))])),
                    alternate: Box::new(object(vec![key_value("color", Expr::str("white"))])),
                },
            )],
            Vec::new(),
        )),
    );

    let out = HoistPass::default().run(module, &resolver());
    assert_eq!(out.hoisted, vec!["__$hoisted_o0", "__$hoisted_o1"]);
    assert!(emit(&out.module)
        .contains("css={props === 'dark' ? __$hoisted_o0 : __$hoisted_o1}"));
}

#[test]
fn test_conditional_with_one_impure_arm() {
    let module = component(
        "Xyz",
        &["props"],
        Expr::Jsx(element(
            "Comp",
            vec![(
                "css",
                Expr::Conditional {
                    test: Box::new(Expr::ident("flag")),
                    consequent: Box::new(object(vec![key_value("color", Expr::ident("props"))])),
                    alternate: Box::new(object(vec![key_value("color", Expr::ident("SPACING"))])),
                },
            )],
            Vec::new(),
        )),
    );

    let out = HoistPass::default().run(module, &resolver());
    assert_eq!(out.hoisted, vec!["__$hoisted_o0"]);
    assert!(emit(&out.module).contains("css={flag ? { color: props } : __$hoisted_o0}"));
}

#[test]
fn test_registry_is_scoped_to_one_file() {
    let pass = HoistPass::default();
    let file = || {
        component(
            "Xyz",
            &[],
            Expr::Jsx(element(
                "Comp",
                vec![("css", object(vec![key_value("a", Expr::num(1.0))]))],
                Vec::new(),
            )),
        )
    };

    let first = pass.run(file(), &resolver());
    let second = pass.run(file(), &resolver());
    assert_eq!(first.hoisted, vec!["__$hoisted_o0"]);
    assert_eq!(second.hoisted, vec!["__$hoisted_o0"]);
    assert_eq!(first.module, second.module);
}

#[test]
fn test_hoisting_inside_impure_attribute_function() {
    // renderItem={(item) => <Row css={{ gap: SPACING }} label={count} />}
    // The outer function reads a local, the inner css object is still pure.
    let row = element(
        "Row",
        vec![
            ("css", object(vec![key_value("gap", Expr::ident("SPACING"))])),
            ("label", Expr::ident("count")),
        ],
        Vec::new(),
    );
    let list = element(
        "List",
        vec![("renderItem", arrow(&["item"], Expr::Jsx(row)))],
        Vec::new(),
    );
    let module = component("Xyz", &[], Expr::Jsx(list));

    let out = HoistPass::default().run(module, &resolver());
    assert_eq!(out.hoisted, vec!["__$hoisted_o0"]);
    let code = emit(&out.module);
    assert!(code.contains("renderItem={(item) => <Row css={__$hoisted_o0} label={count} />}"));
    assert!(code.contains("const __$hoisted_o0 = { gap: SPACING };"));
}

#[test]
fn test_function_declaration_block_body() {
    // function Card(props) { const theme = tokens.dark; return <Box css={{ ... }} />; }
    let body = vec![
        const_decl(
            "theme",
            Expr::Member {
                object: Box::new(Expr::ident("tokens")),
                property: MemberProp::Ident {
                    name: "dark".to_string(),
                },
            },
        ),
        Stmt::Return {
            argument: Some(Expr::Jsx(element(
                "Box",
                vec![(
                    "css",
                    object(vec![key_value(
                        "color",
                        arrow(&["t"], Expr::Member {
                            object: Box::new(Expr::ident("t")),
                            property: MemberProp::Ident {
                                name: "fg".to_string(),
                            },
                        }),
                    )]),
                )],
                Vec::new(),
            ))),
        },
    ];
    let module = Module {
        body: vec![Stmt::Function(FunctionDecl {
            name: Ident::new("Card"),
            function: Function {
                name: None,
                params: vec![Pattern::Ident(Ident::new("props"))],
                body: FunctionBody::Block { body },
            },
            exported: true,
        })],
    };

    let out = HoistPass::default().run(module, &resolver());
    assert_eq!(out.hoisted, vec!["__$hoisted_o0"]);
    assert_eq!(
        emit(&out.module),
        "export function Card(props) {\n  \
           const theme = tokens.dark;\n  \
           return <Box css={__$hoisted_o0} />;\n\
         }\n\
         const __$hoisted_o0 = { color: (t) => t.fg };\n"
    );
}

#[test]
fn test_content_children_are_not_candidates() {
    let module = component(
        "Xyz",
        &[],
        Expr::Jsx(element(
            "Comp",
            Vec::new(),
            vec![JsxChild::Expr {
                expr: object(vec![key_value("a", Expr::num(1.0))]),
            }],
        )),
    );

    let out = HoistPass::default().run(module.clone(), &resolver());
    assert!(out.hoisted.is_empty());
    assert_eq!(out.module, module);
}

#[test]
fn test_second_run_leaves_hoisted_markup_function_alone() {
    // () => <Comp render={() => <A css={{ a: 1 }} />} />
    let resolver = resolver().with("A", Declaration::ImportBinding);
    let inner = element(
        "A",
        vec![("css", object(vec![key_value("a", Expr::num(1.0))]))],
        Vec::new(),
    );
    let module = component(
        "Xyz",
        &[],
        Expr::Jsx(element(
            "Comp",
            vec![("render", arrow(&[], Expr::Jsx(inner)))],
            Vec::new(),
        )),
    );

    let pass = HoistPass::default();
    let once = pass.run(module, &resolver);
    assert_eq!(once.hoisted, vec!["__$hoisted_o0"]);

    let twice = pass.run(once.module.clone(), &resolver);
    assert!(twice.hoisted.is_empty(), "{:?}", twice.hoisted);
    assert_eq!(twice.module, once.module);
    assert_eq!(emit(&twice.module).matches("const __$hoisted_o0").count(), 1);
}

#[test]
fn test_new_names_continue_after_existing_bindings() {
    let mut module = component(
        "Xyz",
        &[],
        Expr::Jsx(element(
            "Comp",
            vec![("css", object(vec![key_value("a", Expr::num(1.0))]))],
            Vec::new(),
        )),
    );
    module
        .body
        .push(const_decl("__$hoisted_o4", object(vec![key_value("b", Expr::num(2.0))])));

    let out = HoistPass::default().run(module, &resolver());
    assert_eq!(out.hoisted, vec!["__$hoisted_o5"]);
    let code = emit(&out.module);
    assert!(code.contains("const __$hoisted_o4 = { b: 2 };"));
    assert!(code.contains("const __$hoisted_o5 = { a: 1 };"));
}

#[test]
fn test_pass_shared_between_threads() {
    let pass = HoistPass::new(Options::with_prop_filter("^css$").unwrap());
    let resolver = resolver();

    let results: Vec<Vec<String>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let pass = &pass;
                let resolver = &resolver;
                scope.spawn(move || {
                    let module = component(
                        "Xyz",
                        &[],
                        Expr::Jsx(element(
                            "Comp",
                            vec![("css", object(vec![key_value("i", Expr::num(i as f64))]))],
                            Vec::new(),
                        )),
                    );
                    pass.run(module, resolver).hoisted
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for hoisted in results {
        assert_eq!(hoisted, vec!["__$hoisted_o0"]);
    }
}
