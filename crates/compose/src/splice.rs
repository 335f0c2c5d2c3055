use arbor_ast::{Expr, LambdaExpr, MemberRef, Parameter, Type};
use arbor_walk::{ReplacementTable, Rewrite};

use crate::error::ComposeError;

/// Builds `A -> C` from `first: A -> B` and `second: B -> C` by inlining `first`'s body in place
/// of `second`'s parameter.
pub fn pipe(first: &Expr, second: &Expr) -> Result<Expr, ComposeError> {
    const HELPER: &str = "pipe";

    let (first, [input]) = lambda::<1>(HELPER, first)?;
    let (second, [middle]) = lambda::<1>(HELPER, second)?;
    expect_type(HELPER, middle.ty(), &first.return_type)?;

    log::debug!("piping {} into {}", first.body, second.body);
    let body = second.body.replace_one(middle.as_expr(), &first.body)?;

    Ok(build(body, vec![input.clone()], second.return_type.clone()))
}

pub fn prepend_to(first: &Expr, second: &Expr) -> Result<Expr, ComposeError> {
    pipe(first, second)
}

/// `pipe` with the arguments the other way around: `second` runs on the result of `first`.
pub fn compose(second: &Expr, first: &Expr) -> Result<Expr, ComposeError> {
    pipe(first, second)
}

pub fn append_to(second: &Expr, first: &Expr) -> Result<Expr, ComposeError> {
    pipe(first, second)
}

/// Builds `A -> C` from `first: A -> B` and `second: (A, B) -> C`.
///
/// `second`'s input parameter becomes `first`'s parameter and its middle parameter becomes
/// `first`'s body. Both substitutions happen in one pass, so the inlined body is never rewritten
/// again.
pub fn combine_body_with(first: &Expr, second: &Expr) -> Result<Expr, ComposeError> {
    const HELPER: &str = "combine_body_with";

    let (first, [param]) = lambda::<1>(HELPER, first)?;
    let (second, [input, middle]) = lambda::<2>(HELPER, second)?;
    expect_type(HELPER, input.ty(), param.ty())?;
    expect_type(HELPER, middle.ty(), &first.return_type)?;

    log::debug!("combining {} with {}", first.body, second.body);
    let table = ReplacementTable::from([
        (input.expr(), param.expr()),
        (middle.expr(), first.body.clone()),
    ]);
    let body = second.body.replace_all(&table)?;

    Ok(build(body, vec![param.clone()], second.return_type.clone()))
}

/// Turns `(P1, .., Pn) -> R` into `(P1, .., Pn) tuple -> R`, reading each former parameter as
/// the field `ItemK` of the single new parameter.
pub fn tuple_parameters(function: &Expr) -> Result<Expr, ComposeError> {
    const HELPER: &str = "tuple_parameters";

    let lambda = as_lambda(HELPER, function)?;
    let tuple_type = Type::tuple(lambda.parameters.iter().map(|p| p.ty().clone()));
    let tuple = Parameter::new("args", tuple_type.clone());

    let table: ReplacementTable = lambda
        .parameters
        .iter()
        .enumerate()
        .map(|(i, param)| {
            let field = MemberRef::field(
                tuple_type.clone(),
                &format!("Item{}", i + 1),
                param.ty().clone(),
            );
            (param.expr(), Expr::member(Some(tuple.expr()), field))
        })
        .collect();

    log::debug!(
        "packing {} parameter(s) of {} into `{tuple_type}`",
        table.len(),
        lambda.body
    );
    let body = lambda.body.replace_all(&table)?;

    Ok(build(body, vec![tuple], lambda.return_type.clone()))
}

/// A lambda taking exactly `N` parameters, along with those parameters.
fn lambda<'a, const N: usize>(
    helper: &'static str,
    expr: &'a Expr,
) -> Result<(&'a LambdaExpr, &'a [Parameter; N]), ComposeError> {
    let lambda = as_lambda(helper, expr)?;
    let params = <&[Parameter; N]>::try_from(lambda.parameters.as_slice()).map_err(|_| {
        ComposeError::Arity {
            helper,
            expected: N,
            found: lambda.parameters.len(),
        }
    })?;
    Ok((lambda, params))
}

fn as_lambda<'a>(helper: &'static str, expr: &'a Expr) -> Result<&'a LambdaExpr, ComposeError> {
    expr.as_lambda().ok_or_else(|| ComposeError::NotALambda {
        helper,
        found: expr.kind_name().to_owned(),
    })
}

fn expect_type(helper: &'static str, expected: &Type, found: &Type) -> Result<(), ComposeError> {
    if expected == found {
        Ok(())
    } else {
        Err(ComposeError::TypeMismatch {
            helper,
            expected: expected.clone(),
            found: found.clone(),
        })
    }
}

fn build(body: Expr, parameters: Vec<Parameter>, return_type: Type) -> Expr {
    LambdaExpr {
        body,
        parameters,
        name: None,
        tail_call: false,
        return_type,
    }
    .into()
}
