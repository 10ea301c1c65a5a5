//! Builders for assembling core terms in code. There is no parser:
//! programs are put together with these helpers, which provide the
//! little conveniences a concrete syntax would (binder runs, argument
//! lists, numerals) while only ever producing plain core terms.

use std::rc::Rc;

use crate::core::{Tm, TmData, Ty};

pub fn var(name: &str) -> Tm {
    Tm::synth(TmData::Var {
        name: name.to_string(),
    })
}

/// Applies a head to any number of arguments, left-associatively.
pub fn app(head: Tm, args: impl IntoIterator<Item = Tm>) -> Tm {
    args.into_iter().fold(head, |head, arg| {
        Tm::synth(TmData::FunApp {
            head: Rc::new(head),
            arg: Rc::new(arg),
        })
    })
}

/// A function literal over a run of parameters.
pub fn abs(params: &[&str], body: Tm) -> Tm {
    params.iter().rev().fold(body, |body, param| {
        Tm::synth(TmData::FunLit {
            name: param.to_string(),
            body: Rc::new(body),
        })
    })
}

/// A chain of let bindings, each annotated with its type.
pub fn let_in(bindings: Vec<(&str, Ty, Tm)>, body: Tm) -> Tm {
    bindings
        .into_iter()
        .rev()
        .fold(body, |body, (name, def_ty, def)| {
            Tm::synth(TmData::Let {
                name: name.to_string(),
                def_ty: Rc::new(def_ty),
                def: Rc::new(def),
                body: Rc::new(body),
            })
        })
}

/// A dependent function type over a run of named domains.
pub fn pi(params: Vec<(&str, Ty)>, body_ty: Ty) -> Ty {
    params
        .into_iter()
        .rev()
        .fold(body_ty, |body_ty, (name, param_ty)| {
            Tm::synth(TmData::FunType {
                name: name.to_string(),
                param_ty: Rc::new(param_ty),
                body_ty: Rc::new(body_ty),
            })
        })
}

/// A function type whose domains bind nothing.
pub fn arrow(domains: Vec<Ty>, body_ty: Ty) -> Ty {
    domains.into_iter().rev().fold(body_ty, |body_ty, domain| {
        Tm::synth(TmData::FunType {
            name: "_".to_string(),
            param_ty: Rc::new(domain),
            body_ty: Rc::new(body_ty),
        })
    })
}

pub fn univ() -> Ty {
    Tm::synth(TmData::Univ)
}

pub fn nat() -> Ty {
    Tm::synth(TmData::Nat)
}

pub fn zero() -> Tm {
    Tm::synth(TmData::Zero)
}

pub fn suc() -> Tm {
    Tm::synth(TmData::Suc)
}

pub fn nat_elim() -> Tm {
    Tm::synth(TmData::NatElim)
}

pub fn eq() -> Tm {
    Tm::synth(TmData::Eq)
}

pub fn refl() -> Tm {
    Tm::synth(TmData::Refl)
}

pub fn eq_elim() -> Tm {
    Tm::synth(TmData::EqElim)
}

/// The unary numeral: n applications of suc around zero.
pub fn num(n: u32) -> Tm {
    (0..n).fold(zero(), |tm, _| app(suc(), [tm]))
}
