use std::fmt::Display;

use crate::core::semantics::{
    app, conv, eval, quote, suspend, vpi, varr, vvar, Env, Vtm, Vty,
};
use crate::core::{pretty, Tm, TmData};
use crate::util::{self, freshen, Lazy, Location};

/// The types of the variables in scope, extended in lockstep with the
/// evaluation environment so that every name resolvable in one is
/// resolvable in the other.
pub type Ctx = util::Env<Vty>;

/// An error raised when a term fails to type check. This is the
/// expected, recoverable kind of failure, and should be reported to
/// whoever wrote the term. Anything that goes wrong past checking is
/// a bug and panics instead.
#[derive(Debug, Clone)]
pub struct TypeError {
    pub location: Option<Location>,
    pub message: String,
}

impl TypeError {
    fn new(message: String) -> TypeError {
        TypeError {
            location: None,
            message,
        }
    }

    /// Pins the error to a span, keeping any span already attached:
    /// whichever frame attached one first was closest to the failure.
    fn at(mut self, location: &Location) -> TypeError {
        if self.location.is_none() {
            self.location = Some(location.clone());
        }
        self
    }
}

impl Display for TypeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.message.fmt(f)
    }
}

impl std::error::Error for TypeError {}

// Bidirectional type checking
//
// The algorithm is split into mutually recursive checking and
// inference modes. Checking mode pushes a known type into the term,
// which is what lets unannotated function literals through; anything
// without a special checking rule is inferred and compared with the
// conversion checker. Types live as values throughout; they are only
// quoted back to syntax at the point an error message needs them.

/// Checks a term against an expected type, given as a value.
pub fn check(env: &Env, ctx: &Ctx, tm: &Tm, expected_ty: &Vty) -> Result<(), TypeError> {
    let result = match (&tm.data, expected_ty) {
        (
            TmData::Let {
                name,
                def_ty,
                def,
                body,
            },
            _,
        ) => {
            check(env, ctx, def_ty, &Vtm::Univ)?;
            let def_vty = eval(env, def_ty);
            check(env, ctx, def, &def_vty)?;
            let def = suspend(env, def);

            check(
                &env.with(name, def),
                &ctx.with(name, def_vty),
                body,
                expected_ty,
            )
        }
        (
            TmData::FunLit { name, body },
            Vtm::FunType {
                param_ty, body_ty, ..
            },
        ) => {
            let fresh = freshen(env, name);
            let var = Lazy::of(vvar(&fresh));

            check(
                &env.with(name, var.clone()),
                &ctx.with(name, param_ty.as_ref().clone()),
                body,
                &body_ty(&var),
            )
        }

        // For anything else, infer a type for the term and ask the
        // conversion checker whether it agrees with the expected one.
        _ => {
            let ty = infer(env, ctx, tm)?;

            if conv(env, &ty, expected_ty) {
                Ok(())
            } else {
                Err(TypeError::new(format!(
                    "mismatched types: expected {}, found {} when checking {}",
                    pretty(0, &quote(env, expected_ty)),
                    pretty(0, &quote(env, &ty)),
                    pretty(0, tm),
                )))
            }
        }
    };

    result.map_err(|e| e.at(&tm.location))
}

/// Infers a type for a term, returning it as a value.
pub fn infer(env: &Env, ctx: &Ctx, tm: &Tm) -> Result<Vty, TypeError> {
    let result = match &tm.data {
        TmData::Var { name } => match ctx.get(name) {
            Some(vty) => Ok(vty.clone()),
            None => Err(TypeError::new(format!("unbound name: {}", name))),
        },
        TmData::FunApp { head, arg } => {
            let head_ty = infer(env, ctx, head)?;
            match head_ty {
                Vtm::FunType {
                    param_ty, body_ty, ..
                } => {
                    check(env, ctx, arg, &param_ty)?;
                    let arg = suspend(env, arg);

                    Ok(body_ty(&arg))
                }
                _ => Err(TypeError::new(format!(
                    "expected a function, found {}",
                    pretty(0, &quote(env, &head_ty))
                ))),
            }
        }
        TmData::FunLit { .. } => Err(TypeError::new(
            "can't infer the type of a function literal".to_string(),
        )),
        TmData::Let {
            name,
            def_ty,
            def,
            body,
        } => {
            check(env, ctx, def_ty, &Vtm::Univ)?;
            let def_vty = eval(env, def_ty);
            check(env, ctx, def, &def_vty)?;
            let def = suspend(env, def);

            infer(&env.with(name, def), &ctx.with(name, def_vty), body)
        }
        // Type is its own type here, which makes the theory
        // inconsistent. Fine for a toy kernel; a real one would carry
        // universe levels.
        TmData::Univ => Ok(Vtm::Univ),
        TmData::FunType {
            name,
            param_ty,
            body_ty,
        } => {
            check(env, ctx, param_ty, &Vtm::Univ)?;
            let param_vty = eval(env, param_ty);
            let fresh = freshen(env, name);
            let var = Lazy::of(vvar(&fresh));
            check(
                &env.with(name, var),
                &ctx.with(name, param_vty),
                body_ty,
                &Vtm::Univ,
            )?;

            Ok(Vtm::Univ)
        }
        TmData::Nat => Ok(Vtm::Univ),
        TmData::Zero => Ok(Vtm::Nat),
        TmData::Suc => Ok(suc_ty()),
        TmData::NatElim => Ok(nat_elim_ty()),
        TmData::Eq => Ok(eq_ty()),
        TmData::Refl => Ok(refl_ty()),
        TmData::EqElim => Ok(eq_elim_ty()),
    };

    result.map_err(|e| e.at(&tm.location))
}

// The types of the built-in constants, built directly as values
// rather than by evaluating syntax.

/// Nat → Nat
pub fn suc_ty() -> Vty {
    varr(Vtm::Nat, Vtm::Nat)
}

/// (P : Nat → Type) → P 0 → ((n : Nat) → P n → P (suc n)) → (n : Nat) → P n
pub fn nat_elim_ty() -> Vty {
    vpi("P", varr(Vtm::Nat, Vtm::Univ), |motive| {
        let motive = motive.clone();
        vpi(
            "Pz",
            app(&motive.force(), &Lazy::of(Vtm::Zero)),
            move |_| {
                let motive = motive.clone();
                let step_ty = {
                    let motive = motive.clone();
                    vpi("n", Vtm::Nat, move |n| {
                        let n = n.clone();
                        varr(
                            app(&motive.force(), &n),
                            app(&motive.force(), &Lazy::of(Vtm::Suc { n: n.clone() })),
                        )
                    })
                };

                vpi("Ps", step_ty, move |_| {
                    let motive = motive.clone();
                    vpi("n", Vtm::Nat, move |n| app(&motive.force(), n))
                })
            },
        )
    })
}

/// (A : Type) → A → A → Type
pub fn eq_ty() -> Vty {
    vpi("A", Vtm::Univ, |ty| {
        varr(ty.force(), varr(ty.force(), Vtm::Univ))
    })
}

/// (A : Type) (x : A) → Eq A x x
pub fn refl_ty() -> Vty {
    vpi("A", Vtm::Univ, |ty| {
        let ty = ty.clone();
        vpi("x", ty.force(), move |tm| Vtm::Eq {
            ty: ty.clone(),
            lhs: tm.clone(),
            rhs: tm.clone(),
        })
    })
}

/// (A : Type) (x : A) (P : (y : A) → Eq A x y → Type)
///   → P x (refl A x) → (y : A) (p : Eq A x y) → P y p
pub fn eq_elim_ty() -> Vty {
    vpi("A", Vtm::Univ, |ty| {
        let ty = ty.clone();
        vpi("x", ty.force(), move |lhs| {
            let ty = ty.clone();
            let lhs = lhs.clone();
            let motive_ty = {
                let ty = ty.clone();
                let lhs = lhs.clone();
                vpi("y", ty.force(), move |rhs| {
                    varr(
                        Vtm::Eq {
                            ty: ty.clone(),
                            lhs: lhs.clone(),
                            rhs: rhs.clone(),
                        },
                        Vtm::Univ,
                    )
                })
            };

            vpi("P", motive_ty, move |motive| {
                let ty = ty.clone();
                let lhs = lhs.clone();
                let motive = motive.clone();
                let refl_case_ty = app(
                    &app(&motive.force(), &lhs),
                    &Lazy::of(Vtm::Refl {
                        ty: ty.clone(),
                        tm: lhs.clone(),
                    }),
                );
                let rest_ty = {
                    let motive = motive.clone();
                    vpi("y", ty.force(), move |rhs| {
                        let motive = motive.clone();
                        let rhs = rhs.clone();
                        vpi(
                            "p",
                            Vtm::Eq {
                                ty: ty.clone(),
                                lhs: lhs.clone(),
                                rhs: rhs.clone(),
                            },
                            move |p| app(&app(&motive.force(), &rhs), p),
                        )
                    })
                };

                varr(refl_case_ty, rest_ty)
            })
        })
    })
}
