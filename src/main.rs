use anyhow::Context;
use clap::Parser;

use elab_dep_elims::check::{check, Ctx};
use elab_dep_elims::core::semantics::{normalize, Env, Vtm};
use elab_dep_elims::core::Tm;
use elab_dep_elims::surface::{
    abs, app, arrow, eq, eq_elim, let_in, nat, nat_elim, num, pi, refl, suc, univ, var, zero,
};

#[derive(Parser)]
#[command(about = "normalize and type check the built-in showcase program")]
struct Args {
    /// Skip the normalization pass
    #[arg(long)]
    no_normalize: bool,

    /// Skip the type checking pass
    #[arg(long)]
    no_check: bool,
}

/// The showcase program: plus and mult by induction on the first
/// argument, a congruence lemma by J, a proof that n + 0 = n, and an
/// arithmetic payoff line for the lot to normalize down to.
fn showcase() -> Tm {
    let_in(
        vec![
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
            ),
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
            ),
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
            ),
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
            ),
        ],
        app(var("plus"), [num(2), app(var("mult"), [num(8), num(5)])]),
    )
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let program = showcase();

    println!("-- program --\n{}", program);

    if !args.no_normalize {
        println!(
            "\n-- normalized --\n{}",
            normalize(&Env::default(), &program)
        );
    }

    if !args.no_check {
        check(&Env::default(), &Ctx::default(), &program, &Vtm::Nat)
            .context("the showcase program failed to type check")?;
        println!("\n-- typecheck --\nOK");
    }

    Ok(())
}
