use std::fmt::Display;
use std::rc::Rc;

use itertools::Itertools;

use crate::util::{Located, Location};

pub type Name = String;

pub type Tm = Located<TmData>;
/// In dependent typing, types are terms.
pub type Ty = Tm;

#[derive(Clone)]
pub enum TmData {
    // Variables
    Var {
        name: Name,
    },

    // Function application
    FunApp {
        head: Rc<Tm>,
        arg: Rc<Tm>,
    },

    // Function literals (i.e. lambda expressions)
    FunLit {
        name: Name,
        body: Rc<Tm>,
    },

    // Let bindings, with a type annotation on the definition
    Let {
        name: Name,
        def_ty: Rc<Ty>,
        def: Rc<Tm>,
        body: Rc<Tm>,
    },

    // Universe (i.e. the type of types)
    Univ,

    // Dependent function types
    FunType {
        name: Name,
        param_ty: Rc<Ty>,
        body_ty: Rc<Ty>,
    },

    // Natural numbers. The constructors and eliminators below are
    // 0-ary constants: their arity is realised through ordinary
    // application, which keeps them uniform with user-level functions.
    Nat,
    Zero,
    Suc,
    NatElim,

    // Propositional equality, its constructor, and its eliminator
    // (also known as J)
    Eq,
    Refl,
    EqElim,
}

impl Tm {
    /// Wraps term data in a synthetic span, for terms that are built
    /// in code rather than parsed from anywhere.
    pub fn synth(data: TmData) -> Tm {
        Tm::new(Location::synthetic(), data)
    }
}

// Pretty-printing
//
// Precedence-aware, with a few of the groupings a human would write:
// runs of binders are collapsed, and applications of suc are printed
// as numerals where they bottom out at zero.

const APP_PREC: u8 = 2;
const PI_PREC: u8 = 1;
const ABS_LET_PREC: u8 = 0;

fn parens_if(cond: bool, s: String) -> String {
    if cond {
        format!("({})", s)
    } else {
        s
    }
}

pub fn pretty(prec: u8, tm: &Tm) -> String {
    match &tm.data {
        TmData::Var { name } => name.clone(),
        TmData::FunApp { head, arg } => {
            if let TmData::Suc = head.data {
                return pretty_suc(prec, arg);
            }

            parens_if(
                prec > APP_PREC,
                format!(
                    "{} {}",
                    pretty(APP_PREC, head),
                    pretty(APP_PREC + 1, arg)
                ),
            )
        }
        TmData::FunLit { name, body } => {
            parens_if(prec > ABS_LET_PREC, pretty_fun_lit(name, body))
        }
        TmData::Let {
            name,
            def_ty,
            def,
            body,
        } => parens_if(
            prec > ABS_LET_PREC,
            format!(
                "let {}: {} = {} in {}",
                name,
                pretty(ABS_LET_PREC, def_ty),
                pretty(ABS_LET_PREC, def),
                pretty(ABS_LET_PREC, body)
            ),
        ),
        TmData::Univ => "Type".to_string(),
        TmData::FunType {
            name,
            param_ty,
            body_ty,
        } => {
            if name == "_" {
                parens_if(
                    prec > PI_PREC,
                    format!(
                        "{} → {}",
                        pretty(APP_PREC, param_ty),
                        pretty(PI_PREC, body_ty)
                    ),
                )
            } else {
                parens_if(prec > PI_PREC, pretty_fun_type(name, param_ty, body_ty))
            }
        }
        TmData::Nat => "Nat".to_string(),
        TmData::Zero => "0".to_string(),
        TmData::Suc => "suc".to_string(),
        TmData::NatElim => "natElim".to_string(),
        TmData::Eq => "Eq".to_string(),
        TmData::Refl => "refl".to_string(),
        TmData::EqElim => "eqElim".to_string(),
    }
}

/// Collapses a run of nested function literals into one binder list.
fn pretty_fun_lit(first_param: &str, body: &Tm) -> String {
    let mut params = vec![first_param.to_string()];
    let mut body = body;
    while let TmData::FunLit { name, body: rest } = &body.data {
        params.push(name.clone());
        body = rest.as_ref();
    }

    format!(
        "λ {}. {}",
        params.iter().join(" "),
        pretty(ABS_LET_PREC, body)
    )
}

/// Collapses a run of named dependent function types into one domain
/// list, stopping at the first anonymous domain.
fn pretty_fun_type(first_name: &str, first_param_ty: &Tm, body: &Tm) -> String {
    let mut domains = vec![(first_name.to_string(), first_param_ty)];
    let mut body = body;
    while let TmData::FunType {
        name,
        param_ty,
        body_ty,
    } = &body.data
    {
        if name == "_" {
            break;
        }
        domains.push((name.clone(), param_ty.as_ref()));
        body = body_ty.as_ref();
    }

    format!(
        "{} → {}",
        domains
            .iter()
            .map(|(name, param_ty)| format!("({}: {})", name, pretty(PI_PREC, param_ty)))
            .join(" "),
        pretty(PI_PREC, body)
    )
}

/// Prints a run of suc applications as a numeral when it bottoms out
/// at zero, and as [n+ tm] otherwise.
fn pretty_suc(prec: u8, arg: &Tm) -> String {
    let mut n = 1;
    let mut body = arg;
    while let TmData::FunApp { head, arg } = &body.data {
        match head.data {
            TmData::Suc => {
                n += 1;
                body = arg.as_ref();
            }
            _ => break,
        }
    }

    if let TmData::Zero = body.data {
        return n.to_string();
    }
    parens_if(prec > APP_PREC, format!("{}+ {}", n, pretty(APP_PREC, body)))
}

impl Display for Tm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        pretty(0, self).fmt(f)
    }
}

pub mod semantics {
    use std::rc::Rc;

    use crate::util::{self, freshen, Lazy};

    use super::{Name, Tm, TmData};

    // Values
    //
    // The semantic domain the evaluator maps terms into. Binders
    // carry an actual Rust closure over their defining environment,
    // so evaluation under a binder never substitutes into syntax.
    // Constructor fields stay suspended until something forces them.
    #[derive(Clone)]
    pub enum Vtm {
        // Neutral values: a free variable together with the
        // eliminations stuck on it
        Neu {
            name: Name,
            spine: Spine,
        },

        Univ,

        FunType {
            name: Name,
            param_ty: Rc<Vtm>,
            body_ty: Rc<dyn Fn(&Lazy<Vtm>) -> Vtm>,
        },
        FunLit {
            name: Name,
            body: Rc<dyn Fn(&Lazy<Vtm>) -> Vtm>,
        },

        Nat,
        Zero,
        Suc {
            n: Lazy<Vtm>,
        },

        Eq {
            ty: Lazy<Vtm>,
            lhs: Lazy<Vtm>,
            rhs: Lazy<Vtm>,
        },
        Refl {
            ty: Lazy<Vtm>,
            tm: Lazy<Vtm>,
        },
    }

    pub type Vty = Vtm;

    // The eliminations pending on a neutral value's head variable,
    // ordered with the outermost elimination last, so that quoting
    // replays them in the order they were applied.
    #[derive(Clone)]
    pub enum Spine {
        Nil,
        App {
            spine: Rc<Spine>,
            arg: Lazy<Vtm>,
        },
        NatElim {
            motive: Lazy<Vtm>,
            zero_case: Lazy<Vtm>,
            suc_case: Lazy<Vtm>,
            spine: Rc<Spine>,
        },
        EqElim {
            ty: Lazy<Vtm>,
            lhs: Lazy<Vtm>,
            motive: Lazy<Vtm>,
            refl_case: Lazy<Vtm>,
            rhs: Lazy<Vtm>,
            spine: Rc<Spine>,
        },
    }

    /// The evaluation environment: names bound to suspended values.
    pub type Env = util::Env<Lazy<Vtm>>;

    /// A variable with nothing applied to it yet.
    pub fn vvar(name: &str) -> Vtm {
        Vtm::Neu {
            name: name.to_string(),
            spine: Spine::Nil,
        }
    }

    /// Builds a dependent function type whose codomain is given as a
    /// Rust closure.
    pub fn vpi(
        name: &str,
        param_ty: Vtm,
        body_ty: impl Fn(&Lazy<Vtm>) -> Vtm + 'static,
    ) -> Vtm {
        Vtm::FunType {
            name: name.to_string(),
            param_ty: Rc::new(param_ty),
            body_ty: Rc::new(body_ty),
        }
    }

    /// A non-dependent function type.
    pub fn varr(param_ty: Vtm, body_ty: Vtm) -> Vtm {
        vpi("_", param_ty, move |_| body_ty.clone())
    }

    /// Defers evaluation of a term until its value is actually needed.
    pub fn suspend(env: &Env, tm: &Rc<Tm>) -> Lazy<Vtm> {
        let env = env.clone();
        let tm = tm.clone();
        Lazy::new(move || eval(&env, &tm))
    }

    // Evaluation
    //
    /// Evaluate a term from the syntax into its semantic
    /// interpretation. Every free variable of the term must be bound
    /// in the environment. On terms that have not been through the
    /// checker this may panic instead of returning; for checked terms
    /// the eliminator and application cases always see the tags they
    /// expect.
    pub fn eval(env: &Env, tm: &Tm) -> Vtm {
        match &tm.data {
            TmData::Var { name } => match env.get(name) {
                Some(value) => value.force(),
                None => panic!("unbound variable {} during evaluation", name),
            },
            TmData::FunApp { head, arg } => {
                let arg = suspend(env, arg);
                app(&eval(env, head), &arg)
            }
            TmData::FunLit { name, body } => {
                let env = env.clone();
                let param = name.clone();
                let body = body.clone();

                Vtm::FunLit {
                    name: name.clone(),
                    body: Rc::new(move |arg| eval(&env.with(&param, arg.clone()), &body)),
                }
            }
            TmData::Let {
                name, def, body, ..
            } => {
                // the annotation has already done its job during
                // checking
                let def = suspend(env, def);
                eval(&env.with(name, def), body)
            }
            TmData::Univ => Vtm::Univ,
            TmData::FunType {
                name,
                param_ty,
                body_ty,
            } => {
                let param_ty1 = eval(env, param_ty);
                let env = env.clone();
                let param = name.clone();
                let body_ty = body_ty.clone();

                Vtm::FunType {
                    name: name.clone(),
                    param_ty: Rc::new(param_ty1),
                    body_ty: Rc::new(move |arg| eval(&env.with(&param, arg.clone()), &body_ty)),
                }
            }
            TmData::Nat => Vtm::Nat,
            TmData::Zero => Vtm::Zero,
            TmData::Suc => Vtm::FunLit {
                name: "n".to_string(),
                body: Rc::new(|n| Vtm::Suc { n: n.clone() }),
            },
            TmData::NatElim => Vtm::FunLit {
                name: "P".to_string(),
                body: Rc::new(|motive| {
                    let motive = motive.clone();
                    Vtm::FunLit {
                        name: "Pz".to_string(),
                        body: Rc::new(move |zero_case| {
                            let motive = motive.clone();
                            let zero_case = zero_case.clone();
                            Vtm::FunLit {
                                name: "Ps".to_string(),
                                body: Rc::new(move |suc_case| {
                                    let motive = motive.clone();
                                    let zero_case = zero_case.clone();
                                    let suc_case = suc_case.clone();
                                    Vtm::FunLit {
                                        name: "n".to_string(),
                                        body: Rc::new(move |n| {
                                            nat_elim(&motive, &zero_case, &suc_case, &n.force())
                                        }),
                                    }
                                }),
                            }
                        }),
                    }
                }),
            },
            TmData::Eq => Vtm::FunLit {
                name: "A".to_string(),
                body: Rc::new(|ty| {
                    let ty = ty.clone();
                    Vtm::FunLit {
                        name: "x".to_string(),
                        body: Rc::new(move |lhs| {
                            let ty = ty.clone();
                            let lhs = lhs.clone();
                            Vtm::FunLit {
                                name: "y".to_string(),
                                body: Rc::new(move |rhs| Vtm::Eq {
                                    ty: ty.clone(),
                                    lhs: lhs.clone(),
                                    rhs: rhs.clone(),
                                }),
                            }
                        }),
                    }
                }),
            },
            TmData::Refl => Vtm::FunLit {
                name: "A".to_string(),
                body: Rc::new(|ty| {
                    let ty = ty.clone();
                    Vtm::FunLit {
                        name: "x".to_string(),
                        body: Rc::new(move |tm| Vtm::Refl {
                            ty: ty.clone(),
                            tm: tm.clone(),
                        }),
                    }
                }),
            },
            TmData::EqElim => Vtm::FunLit {
                name: "A".to_string(),
                body: Rc::new(|ty| {
                    let ty = ty.clone();
                    Vtm::FunLit {
                        name: "x".to_string(),
                        body: Rc::new(move |lhs| {
                            let ty = ty.clone();
                            let lhs = lhs.clone();
                            Vtm::FunLit {
                                name: "P".to_string(),
                                body: Rc::new(move |motive| {
                                    let ty = ty.clone();
                                    let lhs = lhs.clone();
                                    let motive = motive.clone();
                                    Vtm::FunLit {
                                        name: "Prefl".to_string(),
                                        body: Rc::new(move |refl_case| {
                                            let ty = ty.clone();
                                            let lhs = lhs.clone();
                                            let motive = motive.clone();
                                            let refl_case = refl_case.clone();
                                            Vtm::FunLit {
                                                name: "y".to_string(),
                                                body: Rc::new(move |rhs| {
                                                    let ty = ty.clone();
                                                    let lhs = lhs.clone();
                                                    let motive = motive.clone();
                                                    let refl_case = refl_case.clone();
                                                    let rhs = rhs.clone();
                                                    Vtm::FunLit {
                                                        name: "p".to_string(),
                                                        body: Rc::new(move |p| {
                                                            eq_elim(
                                                                &ty,
                                                                &lhs,
                                                                &motive,
                                                                &refl_case,
                                                                &rhs,
                                                                &p.force(),
                                                            )
                                                        }),
                                                    }
                                                }),
                                            }
                                        }),
                                    }
                                }),
                            }
                        }),
                    }
                }),
            },
        }
    }

    // Eliminators
    //
    // Each eliminator reduces on the spot when its scrutinee is a
    // canonical constructor, and otherwise records itself on the
    // neutral's spine. A value whose head is an elimination of a
    // known constructor is never built.

    /// Computes a function application.
    pub fn app(head: &Vtm, arg: &Lazy<Vtm>) -> Vtm {
        match head {
            Vtm::Neu { name, spine } => Vtm::Neu {
                name: name.clone(),
                spine: Spine::App {
                    spine: Rc::new(spine.clone()),
                    arg: arg.clone(),
                },
            },
            Vtm::FunLit { body, .. } => body(arg),
            _ => panic!("not a function"),
        }
    }

    /// Runs the natural number eliminator against a scrutinee.
    pub fn nat_elim(
        motive: &Lazy<Vtm>,
        zero_case: &Lazy<Vtm>,
        suc_case: &Lazy<Vtm>,
        n: &Vtm,
    ) -> Vtm {
        match n {
            Vtm::Neu { name, spine } => Vtm::Neu {
                name: name.clone(),
                spine: Spine::NatElim {
                    motive: motive.clone(),
                    zero_case: zero_case.clone(),
                    suc_case: suc_case.clone(),
                    spine: Rc::new(spine.clone()),
                },
            },
            Vtm::Zero => zero_case.force(),
            Vtm::Suc { n: pred } => {
                // the recursive occurrence stays suspended: the
                // continuation decides how much of the unfolding it
                // actually needs
                let rec = {
                    let motive = motive.clone();
                    let zero_case = zero_case.clone();
                    let suc_case = suc_case.clone();
                    let pred = pred.clone();
                    Lazy::new(move || nat_elim(&motive, &zero_case, &suc_case, &pred.force()))
                };

                app(&app(&suc_case.force(), &Lazy::of(n.clone())), &rec)
            }
            _ => panic!("not a number"),
        }
    }

    /// Runs the equality eliminator against a scrutinee.
    pub fn eq_elim(
        ty: &Lazy<Vtm>,
        lhs: &Lazy<Vtm>,
        motive: &Lazy<Vtm>,
        refl_case: &Lazy<Vtm>,
        rhs: &Lazy<Vtm>,
        p: &Vtm,
    ) -> Vtm {
        match p {
            Vtm::Neu { name, spine } => Vtm::Neu {
                name: name.clone(),
                spine: Spine::EqElim {
                    ty: ty.clone(),
                    lhs: lhs.clone(),
                    motive: motive.clone(),
                    refl_case: refl_case.clone(),
                    rhs: rhs.clone(),
                    spine: Rc::new(spine.clone()),
                },
            },
            Vtm::Refl { .. } => refl_case.force(),
            _ => panic!("not an equality proof"),
        }
    }

    // Quotation
    //
    // Converts values back into syntax in beta/eliminator-normal
    // form. The environment is only consulted for its key set, to
    // pick fresh names for binders; nothing is ever looked up in it.

    fn quote_app(head: Tm, args: Vec<Tm>) -> Tm {
        args.into_iter().fold(head, |head, arg| {
            Tm::synth(TmData::FunApp {
                head: Rc::new(head),
                arg: Rc::new(arg),
            })
        })
    }

    pub fn quote(env: &Env, vtm: &Vtm) -> Tm {
        match vtm {
            Vtm::Neu { name, spine } => quote_spine(
                env,
                Tm::synth(TmData::Var { name: name.clone() }),
                spine,
            ),
            Vtm::FunLit { name, body } => {
                let fresh = freshen(env, name);
                let var = Lazy::of(vvar(&fresh));
                let body = quote(&env.with(&fresh, var.clone()), &body(&var));

                Tm::synth(TmData::FunLit {
                    name: fresh,
                    body: Rc::new(body),
                })
            }
            Vtm::FunType {
                name,
                param_ty,
                body_ty,
            } => {
                let fresh = freshen(env, name);
                let var = Lazy::of(vvar(&fresh));
                let param_ty = quote(env, param_ty);
                let body_ty = quote(&env.with(&fresh, var.clone()), &body_ty(&var));

                Tm::synth(TmData::FunType {
                    name: fresh,
                    param_ty: Rc::new(param_ty),
                    body_ty: Rc::new(body_ty),
                })
            }
            Vtm::Univ => Tm::synth(TmData::Univ),
            Vtm::Nat => Tm::synth(TmData::Nat),
            Vtm::Zero => Tm::synth(TmData::Zero),
            Vtm::Suc { n } => quote_app(
                Tm::synth(TmData::Suc),
                vec![quote(env, &n.force())],
            ),
            Vtm::Eq { ty, lhs, rhs } => quote_app(
                Tm::synth(TmData::Eq),
                vec![
                    quote(env, &ty.force()),
                    quote(env, &lhs.force()),
                    quote(env, &rhs.force()),
                ],
            ),
            Vtm::Refl { ty, tm } => quote_app(
                Tm::synth(TmData::Refl),
                vec![quote(env, &ty.force()), quote(env, &tm.force())],
            ),
        }
    }

    /// Replays a spine around an already-quoted head, innermost
    /// elimination first.
    pub fn quote_spine(env: &Env, head: Tm, spine: &Spine) -> Tm {
        match spine {
            Spine::Nil => head,
            Spine::App { spine, arg } => Tm::synth(TmData::FunApp {
                head: Rc::new(quote_spine(env, head, spine)),
                arg: Rc::new(quote(env, &arg.force())),
            }),
            Spine::NatElim {
                motive,
                zero_case,
                suc_case,
                spine,
            } => quote_app(
                Tm::synth(TmData::NatElim),
                vec![
                    quote(env, &motive.force()),
                    quote(env, &zero_case.force()),
                    quote(env, &suc_case.force()),
                    quote_spine(env, head, spine),
                ],
            ),
            Spine::EqElim {
                ty,
                lhs,
                motive,
                refl_case,
                rhs,
                spine,
            } => quote_app(
                Tm::synth(TmData::EqElim),
                vec![
                    quote(env, &ty.force()),
                    quote(env, &lhs.force()),
                    quote(env, &motive.force()),
                    quote(env, &refl_case.force()),
                    quote(env, &rhs.force()),
                    quote_spine(env, head, spine),
                ],
            ),
        }
    }

    // Conversion
    //
    // Decides definitional equality of two values directly, without
    // quoting either side. Beta and eliminator reductions have
    // already happened by virtue of both sides being values; what is
    // left is structural comparison, plus the eta rule for functions.

    pub fn conv(env: &Env, t: &Vtm, u: &Vtm) -> bool {
        match (t, u) {
            (Vtm::Univ, Vtm::Univ) | (Vtm::Nat, Vtm::Nat) | (Vtm::Zero, Vtm::Zero) => true,
            (Vtm::Suc { n: n1 }, Vtm::Suc { n: n2 }) => conv(env, &n1.force(), &n2.force()),
            (
                Vtm::Eq {
                    ty: ty1,
                    lhs: lhs1,
                    rhs: rhs1,
                },
                Vtm::Eq {
                    ty: ty2,
                    lhs: lhs2,
                    rhs: rhs2,
                },
            ) => {
                conv(env, &ty1.force(), &ty2.force())
                    && conv(env, &lhs1.force(), &lhs2.force())
                    && conv(env, &rhs1.force(), &rhs2.force())
            }
            (Vtm::Refl { ty: ty1, tm: tm1 }, Vtm::Refl { ty: ty2, tm: tm2 }) => {
                conv(env, &ty1.force(), &ty2.force()) && conv(env, &tm1.force(), &tm2.force())
            }
            (
                Vtm::Neu {
                    name: name1,
                    spine: spine1,
                },
                Vtm::Neu {
                    name: name2,
                    spine: spine2,
                },
            ) => name1 == name2 && conv_spine(env, spine1, spine2),
            (
                Vtm::FunType {
                    name,
                    param_ty: param_ty1,
                    body_ty: body_ty1,
                },
                Vtm::FunType {
                    param_ty: param_ty2,
                    body_ty: body_ty2,
                    ..
                },
            ) => {
                let fresh = freshen(env, name);
                let var = Lazy::of(vvar(&fresh));

                conv(env, param_ty1, param_ty2)
                    && conv(
                        &env.with(&fresh, var.clone()),
                        &body_ty1(&var),
                        &body_ty2(&var),
                    )
            }
            (
                Vtm::FunLit { name, body: body1 },
                Vtm::FunLit { body: body2, .. },
            ) => {
                let fresh = freshen(env, name);
                let var = Lazy::of(vvar(&fresh));

                conv(&env.with(&fresh, var.clone()), &body1(&var), &body2(&var))
            }
            // Eta: a lone function literal agrees with any other
            // function value when their bodies agree at a shared
            // fresh argument
            (Vtm::FunLit { name, body }, u) => {
                let fresh = freshen(env, name);
                let var = Lazy::of(vvar(&fresh));

                conv(&env.with(&fresh, var.clone()), &body(&var), &app(u, &var))
            }
            (t, Vtm::FunLit { name, body }) => {
                let fresh = freshen(env, name);
                let var = Lazy::of(vvar(&fresh));

                conv(&env.with(&fresh, var.clone()), &app(t, &var), &body(&var))
            }
            _ => false,
        }
    }

    /// Two spines are equal when they stack the same eliminations,
    /// with equal captured values at every frame.
    fn conv_spine(env: &Env, s: &Spine, t: &Spine) -> bool {
        match (s, t) {
            (Spine::Nil, Spine::Nil) => true,
            (
                Spine::App {
                    spine: spine1,
                    arg: arg1,
                },
                Spine::App {
                    spine: spine2,
                    arg: arg2,
                },
            ) => conv_spine(env, spine1, spine2) && conv(env, &arg1.force(), &arg2.force()),
            (
                Spine::NatElim {
                    motive: motive1,
                    zero_case: zero_case1,
                    suc_case: suc_case1,
                    spine: spine1,
                },
                Spine::NatElim {
                    motive: motive2,
                    zero_case: zero_case2,
                    suc_case: suc_case2,
                    spine: spine2,
                },
            ) => {
                conv_spine(env, spine1, spine2)
                    && conv(env, &motive1.force(), &motive2.force())
                    && conv(env, &zero_case1.force(), &zero_case2.force())
                    && conv(env, &suc_case1.force(), &suc_case2.force())
            }
            (
                Spine::EqElim {
                    ty: ty1,
                    lhs: lhs1,
                    motive: motive1,
                    refl_case: refl_case1,
                    rhs: rhs1,
                    spine: spine1,
                },
                Spine::EqElim {
                    ty: ty2,
                    lhs: lhs2,
                    motive: motive2,
                    refl_case: refl_case2,
                    rhs: rhs2,
                    spine: spine2,
                },
            ) => {
                conv_spine(env, spine1, spine2)
                    && conv(env, &ty1.force(), &ty2.force())
                    && conv(env, &lhs1.force(), &lhs2.force())
                    && conv(env, &motive1.force(), &motive2.force())
                    && conv(env, &refl_case1.force(), &refl_case2.force())
                    && conv(env, &rhs1.force(), &rhs2.force())
            }
            _ => false,
        }
    }

    // Normalisation
    //
    /// By evaluating a term then quoting the result, we can produce a
    /// term that is reduced as much as possible in the current
    /// environment.
    pub fn normalize(env: &Env, tm: &Tm) -> Tm {
        quote(env, &eval(env, tm))
    }
}
