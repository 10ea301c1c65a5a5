use std::rc::Rc;

use crate::check::{check, infer, Ctx};
use crate::core::semantics::{
    app as vapp, conv, eq_elim as veq_elim, eval, nat_elim as vnat_elim, normalize, varr, vpi,
    vvar, Env, Vtm,
};
use crate::core::{Tm, TmData};
use crate::surface::{
    abs, app, arrow, eq, eq_elim, let_in, nat, nat_elim, num, pi, refl, suc, univ, var, zero,
};
use crate::util::{Lazy, Location};

// Example definitions, shared between tests. Addition and
// multiplication recurse on their first argument via natElim.

fn plus_def() -> (&'static str, Tm, Tm) {
    (
        "plus",
        arrow(vec![nat(), nat()], nat()),
        abs(
            &["m", "n"],
            app(
                nat_elim(),
                [abs(&["_"], nat()), var("n"), abs(&["_"], suc()), var("m")],
            ),
        ),
    )
}

fn mult_def() -> (&'static str, Tm, Tm) {
    (
        "mult",
        arrow(vec![nat(), nat()], nat()),
        abs(
            &["m", "n"],
            app(
                nat_elim(),
                [
                    abs(&["_"], nat()),
                    zero(),
                    abs(&["_"], app(var("plus"), [var("n")])),
                    var("m"),
                ],
            ),
        ),
    )
}

fn cong_def() -> (&'static str, Tm, Tm) {
    (
        "cong",
        pi(
            vec![
                ("A", univ()),
                ("B", univ()),
                ("f", arrow(vec![var("A")], var("B"))),
                ("x", var("A")),
                ("y", var("A")),
            ],
            arrow(
                vec![app(eq(), [var("A"), var("x"), var("y")])],
                app(
                    eq(),
                    [
                        var("B"),
                        app(var("f"), [var("x")]),
                        app(var("f"), [var("y")]),
                    ],
                ),
            ),
        ),
        abs(
            &["A", "B", "f", "x"],
            app(
                eq_elim(),
                [
                    var("A"),
                    var("x"),
                    abs(
                        &["y", "_"],
                        app(
                            eq(),
                            [
                                var("B"),
                                app(var("f"), [var("x")]),
                                app(var("f"), [var("y")]),
                            ],
                        ),
                    ),
                    app(refl(), [var("B"), app(var("f"), [var("x")])]),
                ],
            ),
        ),
    )
}

fn plus_identity_right_def() -> (&'static str, Tm, Tm) {
    (
        "plus-identity-right",
        pi(
            vec![("n", nat())],
            app(
                eq(),
                [nat(), app(var("plus"), [var("n"), zero()]), var("n")],
            ),
        ),
        app(
            nat_elim(),
            [
                abs(
                    &["n"],
                    app(
                        eq(),
                        [nat(), app(var("plus"), [var("n"), zero()]), var("n")],
                    ),
                ),
                app(refl(), [nat(), zero()]),
                abs(
                    &["n"],
                    app(
                        var("cong"),
                        [
                            nat(),
                            nat(),
                            suc(),
                            app(var("plus"), [var("n"), zero()]),
                            var("n"),
                        ],
                    ),
                ),
            ],
        ),
    )
}

fn showcase() -> Tm {
    let_in(
        vec![
            plus_def(),
            mult_def(),
            cong_def(),
            plus_identity_right_def(),
        ],
        app(var("plus"), [num(2), app(var("mult"), [num(8), num(5)])]),
    )
}

/// An environment where the given names all stand for themselves.
fn neutral_env(names: &[&str]) -> Env {
    names.iter().fold(Env::default(), |env, name| {
        env.with(name, Lazy::of(vvar(name)))
    })
}

#[test]
fn arithmetic_normalizes_to_a_numeral() {
    let tm = let_in(
        vec![plus_def(), mult_def()],
        app(var("plus"), [num(2), app(var("mult"), [num(8), num(5)])]),
    );

    insta::assert_snapshot!(normalize(&Env::default(), &tm).to_string(), @"42")
}

#[test]
fn showcase_program_type_checks() {
    let program = showcase();

    assert!(check(&Env::default(), &Ctx::default(), &program, &Vtm::Nat).is_ok());
    insta::assert_snapshot!(normalize(&Env::default(), &program).to_string(), @"42")
}

#[test]
fn normal_forms_are_idempotent() {
    let env = neutral_env(&["P", "pz", "ps", "n"]);
    let stuck = app(nat_elim(), [var("P"), var("pz"), var("ps"), var("n")]);

    let once = normalize(&env, &stuck);
    let twice = normalize(&env, &once);
    assert_eq!(once.to_string(), twice.to_string());

    let shadowed = abs(&["x", "x"], var("x"));
    let once = normalize(&Env::default(), &shadowed);
    let twice = normalize(&Env::default(), &once);
    assert_eq!(once.to_string(), twice.to_string());
}

#[test]
fn stuck_nat_eliminations_quote_in_application_order() {
    let env = neutral_env(&["P", "pz", "ps", "n"]);
    let tm = app(nat_elim(), [var("P"), var("pz"), var("ps"), var("n")]);

    insta::assert_snapshot!(normalize(&env, &tm).to_string(), @"natElim P pz ps n")
}

#[test]
fn stuck_eq_eliminations_quote_in_application_order() {
    let env = neutral_env(&["A", "x", "P", "Prefl", "y", "p"]);
    let tm = app(
        eq_elim(),
        [
            var("A"),
            var("x"),
            var("P"),
            var("Prefl"),
            var("y"),
            var("p"),
        ],
    );

    insta::assert_snapshot!(normalize(&env, &tm).to_string(), @"eqElim A x P Prefl y p")
}

#[test]
fn quoting_freshens_shadowed_binders() {
    let tm = abs(&["x", "x", "x"], var("x"));

    insta::assert_snapshot!(normalize(&Env::default(), &tm).to_string(), @"λ x x' x''. x''")
}

#[test]
fn functions_are_equal_up_to_eta() {
    let env = neutral_env(&["f"]);
    let f = vvar("f");
    let expanded = {
        let f = f.clone();
        Vtm::FunLit {
            name: "x".to_string(),
            body: Rc::new(move |x| vapp(&f, x)),
        }
    };

    assert!(conv(&env, &f, &expanded));
    assert!(conv(&env, &expanded, &f));
    assert!(!conv(&env, &Vtm::Zero, &Vtm::Nat));
}

#[test]
fn conversion_chains_through_eta_expansions() {
    let env = neutral_env(&["f"]);
    let f = vvar("f");
    let left = eval(&env, &abs(&["x"], app(var("f"), [var("x")])));
    let right = eval(&env, &abs(&["y"], app(var("f"), [var("y")])));

    // the bare neutral sits between two differently-named expansions,
    // so each link and the outer pair must all agree
    assert!(conv(&env, &left, &f));
    assert!(conv(&env, &f, &right));
    assert!(conv(&env, &left, &right));
}

#[test]
fn conversion_is_reflexive_across_evaluations() {
    let (_, _, plus) = plus_def();

    let v1 = eval(&Env::default(), &plus);
    let v2 = eval(&Env::default(), &plus);
    assert!(conv(&Env::default(), &v1, &v2));
}

#[test]
fn nat_elim_reduces_on_zero() {
    let motive = Lazy::of(vvar("P"));
    let zero_case = Lazy::of(vvar("pz"));
    let suc_case = Lazy::of(vvar("ps"));

    let result = vnat_elim(&motive, &zero_case, &suc_case, &Vtm::Zero);
    assert!(conv(&Env::default(), &result, &vvar("pz")));
}

#[test]
fn nat_elim_reduces_on_suc() {
    let motive = Lazy::of(vvar("P"));
    let zero_case = Lazy::of(vvar("pz"));
    let suc_case = Lazy::of(vvar("ps"));
    let one = Vtm::Suc {
        n: Lazy::of(Vtm::Zero),
    };

    // the step function receives the successor value itself, and the
    // still-suspended elimination of its predecessor
    let result = vnat_elim(&motive, &zero_case, &suc_case, &one);
    let expected = vapp(
        &vapp(&vvar("ps"), &Lazy::of(one.clone())),
        &Lazy::of(vnat_elim(&motive, &zero_case, &suc_case, &Vtm::Zero)),
    );
    assert!(conv(&Env::default(), &result, &expected));
}

#[test]
fn nat_elim_defers_the_recursive_call() {
    let motive = Lazy::of(vvar("P"));
    let zero_case = Lazy::of(vvar("pz"));
    let step = Vtm::FunLit {
        name: "_".to_string(),
        body: Rc::new(|_| Vtm::FunLit {
            name: "_".to_string(),
            body: Rc::new(|_| Vtm::Zero),
        }),
    };
    let poisoned = Vtm::Suc {
        n: Lazy::new(|| panic!("the predecessor was forced")),
    };

    // the step ignores both of its arguments, so neither the
    // predecessor nor the recursive elimination may ever be forced
    let result = vnat_elim(&motive, &zero_case, &Lazy::of(step), &poisoned);
    assert!(conv(&Env::default(), &result, &Vtm::Zero));
}

#[test]
fn eq_elim_reduces_on_refl() {
    let ty = Lazy::of(Vtm::Nat);
    let lhs = Lazy::of(Vtm::Zero);
    let motive = Lazy::of(vvar("P"));
    let refl_case = Lazy::of(vvar("prefl"));
    let rhs = Lazy::of(Vtm::Zero);
    let proof = Vtm::Refl {
        ty: Lazy::of(Vtm::Nat),
        tm: Lazy::of(Vtm::Zero),
    };

    let result = veq_elim(&ty, &lhs, &motive, &refl_case, &rhs, &proof);
    assert!(conv(&Env::default(), &result, &vvar("prefl")));
}

#[test]
fn identity_checks_against_a_function_type() {
    let tm = abs(&["x"], var("x"));
    let ty = varr(Vtm::Nat, Vtm::Nat);

    assert!(check(&Env::default(), &Ctx::default(), &tm, &ty).is_ok());
}

#[test]
fn polymorphic_identity_checks_against_a_dependent_type() {
    let tm = abs(&["A", "x"], var("x"));
    let ty = vpi("A", Vtm::Univ, |a| varr(a.force(), a.force()));

    assert!(check(&Env::default(), &Ctx::default(), &tm, &ty).is_ok());
}

#[test]
fn cong_checks_against_its_type() {
    let (_, ty, tm) = cong_def();
    let vty = eval(&Env::default(), &ty);

    assert!(check(&Env::default(), &Ctx::default(), &tm, &vty).is_ok());
}

#[test]
fn applying_a_number_is_rejected() {
    let tm = app(zero(), [zero()]);

    let err = check(&Env::default(), &Ctx::default(), &tm, &Vtm::Nat).unwrap_err();
    insta::assert_snapshot!(err.message, @"expected a function, found Nat")
}

#[test]
fn unknown_variables_are_reported() {
    let err = infer(&Env::default(), &Ctx::default(), &var("undefined"))
        .err()
        .unwrap();
    insta::assert_snapshot!(err.message, @"unbound name: undefined")
}

#[test]
fn function_literals_do_not_infer() {
    let err = infer(&Env::default(), &Ctx::default(), &abs(&["x"], var("x")))
        .err()
        .unwrap();
    insta::assert_snapshot!(err.message, @"can't infer the type of a function literal")
}

#[test]
fn mismatches_report_both_types_and_the_term() {
    let err = check(&Env::default(), &Ctx::default(), &zero(), &Vtm::Univ).unwrap_err();
    insta::assert_snapshot!(err.message, @"mismatched types: expected Type, found Nat when checking 0")
}

#[test]
fn application_instantiates_the_codomain() {
    let env = neutral_env(&["f"]);
    let ctx = Ctx::default().with("f", varr(Vtm::Nat, Vtm::Nat));

    let ty = infer(&env, &ctx, &app(var("f"), [zero()])).unwrap();
    assert!(conv(&env, &ty, &Vtm::Nat));
}

#[test]
fn pi_formation_is_a_type() {
    let tm = pi(vec![("A", univ())], arrow(vec![var("A")], var("A")));

    let ty = infer(&Env::default(), &Ctx::default(), &tm).unwrap();
    assert!(matches!(ty, Vtm::Univ));
}

#[test]
fn let_bindings_shadow_and_check() {
    let tm = let_in(
        vec![
            ("x", nat(), zero()),
            ("x", nat(), app(suc(), [var("x")])),
        ],
        var("x"),
    );

    assert!(check(&Env::default(), &Ctx::default(), &tm, &Vtm::Nat).is_ok());
    insta::assert_snapshot!(normalize(&Env::default(), &tm).to_string(), @"1")
}

#[test]
fn unused_definitions_are_never_run() {
    // the definition would panic if evaluated, but nothing forces it
    let tm = let_in(vec![("boom", nat(), app(zero(), [zero()]))], zero());

    insta::assert_snapshot!(normalize(&Env::default(), &tm).to_string(), @"0")
}

#[test]
fn errors_carry_the_innermost_span() {
    let bad_app = Tm::new(
        Location::new(3, 9),
        TmData::FunApp {
            head: Rc::new(Tm::new(Location::new(3, 4), TmData::Zero)),
            arg: Rc::new(Tm::new(Location::new(5, 9), TmData::Zero)),
        },
    );
    let program = Tm::new(
        Location::new(0, 20),
        TmData::Let {
            name: "x".to_string(),
            def_ty: Rc::new(Tm::new(Location::new(0, 0), TmData::Nat)),
            def: Rc::new(bad_app),
            body: Rc::new(Tm::new(Location::new(15, 16), TmData::Zero)),
        },
    );

    let err = check(&Env::default(), &Ctx::default(), &program, &Vtm::Nat).unwrap_err();
    let location = err.location.expect("type errors carry a span");
    assert_eq!((location.start, location.end), (3, 9));
}
