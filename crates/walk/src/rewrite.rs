use std::{collections::HashMap, ops::ControlFlow};

use arbor_ast::Expr;

use crate::{
    decision::{Decision, Outcome},
    error::TraverseError,
    walker::{traverse_with, walk_tree},
};

/// Maps nodes, by identity, to the node that should take their place.
pub type ReplacementTable = HashMap<Expr, Expr>;

/// Replace every node `selector` picks, top-down and in a single pass.
///
/// A selected node is swapped for its replacement without looking inside either of them, so the
/// replacement is never itself matched against the selector.
pub fn replace_where<F>(root: &Expr, mut selector: F) -> Result<Expr, TraverseError>
where
    F: FnMut(&Expr) -> Option<Expr>,
{
    let (ControlFlow::Continue(node) | ControlFlow::Break(node)) = walk_tree(root, |expr| {
        selector(expr).map(|replacement| Decision::replace(replacement).without_descent())
    })?;
    Ok(node)
}

/// Replace every occurrence of each key of `table` with its value.
///
/// Replacement values are not searched, so a value that mentions its own key does not recurse.
pub fn replace_all(root: &Expr, table: &ReplacementTable) -> Result<Expr, TraverseError> {
    replace_where(root, |expr| table.get(expr).cloned())
}

pub fn replace_one(
    root: &Expr,
    target: Option<&Expr>,
    replacement: Option<&Expr>,
) -> Result<Expr, TraverseError> {
    let target = target.ok_or(TraverseError::InvalidArgument("target"))?;
    let replacement = replacement.ok_or(TraverseError::InvalidArgument("replacement"))?;
    replace_where(root, |expr| (expr == target).then(|| replacement.clone()))
}

/// Method-call forms of the traversal entry points.
pub trait Rewrite {
    fn traverse(
        &self,
        callback: impl FnMut(&Expr) -> Option<Decision>,
    ) -> Result<Outcome, TraverseError>;

    fn replace_where(
        &self,
        selector: impl FnMut(&Expr) -> Option<Expr>,
    ) -> Result<Expr, TraverseError>;

    fn replace_all(&self, table: &ReplacementTable) -> Result<Expr, TraverseError>;

    fn replace_one(&self, target: &Expr, replacement: &Expr) -> Result<Expr, TraverseError>;
}

impl Rewrite for Expr {
    fn traverse(
        &self,
        callback: impl FnMut(&Expr) -> Option<Decision>,
    ) -> Result<Outcome, TraverseError> {
        traverse_with(self, callback)
    }

    fn replace_where(
        &self,
        selector: impl FnMut(&Expr) -> Option<Expr>,
    ) -> Result<Expr, TraverseError> {
        replace_where(self, selector)
    }

    fn replace_all(&self, table: &ReplacementTable) -> Result<Expr, TraverseError> {
        replace_all(self, table)
    }

    fn replace_one(&self, target: &Expr, replacement: &Expr) -> Result<Expr, TraverseError> {
        replace_one(self, Some(target), Some(replacement))
    }
}

#[cfg(test)]
mod tests {
    use arbor_ast::{
        Binder, BinaryOp, CatchBlock, ConstructorRef, ElementInit, ExprKind, GotoKind,
        IndexerRef, LabelTarget, MemberRef, MethodRef, Parameter, SwitchCase, Type, UnaryOp,
    };
    use rand::{Rng, SeedableRng, rngs::SmallRng};

    use super::*;

    fn random_expr(rng: &mut SmallRng, depth: u32, leaves: &[Parameter]) -> Expr {
        if depth == 0 || rng.random_bool(0.2) {
            return match rng.random_range(0..3) {
                0 => Expr::constant(rng.random_range(-100i64..100)),
                1 => Expr::default_value(Type::Int),
                _ => leaves[rng.random_range(0..leaves.len())].expr(),
            };
        }

        let sub = |rng: &mut SmallRng| random_expr(rng, depth - 1, leaves);
        match rng.random_range(0..10) {
            0 => Expr::negate(sub(rng)),
            1 => {
                let op = [BinaryOp::Add, BinaryOp::Multiply, BinaryOp::LessThan]
                    [rng.random_range(0..3)];
                Expr::binary(op, sub(rng), sub(rng))
            }
            2 => Expr::conditional(sub(rng), sub(rng), sub(rng)),
            3 => {
                let method = MethodRef::function("f", [Type::Int, Type::Int], Type::Int);
                Expr::call(None, method, vec![sub(rng), sub(rng)])
            }
            4 => {
                let p = Parameter::new("p", Type::Int);
                Expr::invoke(Expr::lambda(sub(rng), vec![p]), vec![sub(rng)])
            }
            5 => Expr::new_array_init(Type::Int, vec![sub(rng), sub(rng), sub(rng)]),
            6 => {
                let v = Parameter::new("v", Type::Int);
                Expr::block(vec![v.clone()], vec![Expr::assign(v.expr(), sub(rng)), sub(rng)])
            }
            7 => Expr::switch(
                sub(rng),
                rng.random_bool(0.5).then(|| sub(rng)),
                vec![SwitchCase {
                    test_values: vec![sub(rng)],
                    body: sub(rng),
                }],
                None,
            ),
            8 => Expr::try_catch(
                sub(rng),
                rng.random_bool(0.5).then(|| sub(rng)),
                vec![CatchBlock {
                    test: Type::Object,
                    variable: None,
                    filter: None,
                    body: sub(rng),
                }],
            ),
            _ => Expr::index(
                Expr::new_array_init(Type::Int, vec![sub(rng)]),
                IndexerRef::new(Type::array(Type::Int), [Type::Int], Type::Int),
                vec![sub(rng)],
            ),
        }
    }

    fn count(root: &Expr, target: &Expr) -> usize {
        let mut n = 0;
        root.traverse(|node| {
            if node == target {
                n += 1;
            }
            None
        })
        .unwrap();
        n
    }

    #[test]
    fn identity_law() {
        let mut rng = SmallRng::seed_from_u64(0x5eed);
        let leaves = [Parameter::new("x", Type::Int), Parameter::new("y", Type::Int)];

        for _ in 0..200 {
            let tree = random_expr(&mut rng, 5, &leaves);
            let rendered = tree.to_string();

            let outcome = tree.traverse(|_| None).unwrap();
            assert!(outcome.fully_visited);
            let node = outcome.into_node().unwrap();
            assert!(node.ptr_eq(&tree));
            assert_eq!(node.to_string(), rendered);

            assert!(tree.replace_where(|_| None).unwrap().ptr_eq(&tree));
        }
    }

    #[test]
    fn replace_every_occurrence() {
        let mut rng = SmallRng::seed_from_u64(42);
        let x = Parameter::new("x", Type::Int);
        let y = Parameter::new("y", Type::Int);
        let leaves = [x.clone(), y.clone()];
        let z = Parameter::new("z", Type::Int);

        for _ in 0..200 {
            let tree = random_expr(&mut rng, 5, &leaves);
            let before_x = count(&tree, x.as_expr());
            let before_y = count(&tree, y.as_expr());

            let replaced = tree.replace_one(x.as_expr(), z.as_expr()).unwrap();
            assert_eq!(count(&replaced, x.as_expr()), 0);
            assert_eq!(count(&replaced, z.as_expr()), before_x);
            assert_eq!(count(&replaced, y.as_expr()), before_y);
            if before_x == 0 {
                assert!(replaced.ptr_eq(&tree));
            }
        }
    }

    #[test]
    fn table_is_applied_in_one_pass() {
        let x = Parameter::new("x", Type::Int);
        let y = Parameter::new("y", Type::Int);
        let tree = Expr::add(x.expr(), y.expr());

        // Swapping x and y must not chase the replacements.
        let table = ReplacementTable::from([(x.expr(), y.expr()), (y.expr(), x.expr())]);
        assert_eq!(tree.replace_all(&table).unwrap().to_string(), "(y + x)");

        // A value mentioning its own key is not searched again.
        let grown = Expr::add(x.expr(), Expr::constant(1));
        let table = ReplacementTable::from([(x.expr(), grown)]);
        assert_eq!(tree.replace_all(&table).unwrap().to_string(), "((x + 1) + y)");

        assert!(tree.replace_all(&ReplacementTable::new()).unwrap().ptr_eq(&tree));

        // Keys at different depths, one nested under the other's sibling.
        let a = Parameter::new("a", Type::Int);
        let b = Parameter::new("b", Type::Int);
        let c = Parameter::new("c", Type::Int);
        let tree = Expr::add(a.expr(), Expr::multiply(c.expr(), b.expr()));
        let table = ReplacementTable::from([
            (a.expr(), Expr::add(b.expr(), Expr::constant(1))),
            (b.expr(), Expr::multiply(a.expr(), Expr::constant(2))),
        ]);
        assert_eq!(
            tree.replace_all(&table).unwrap().to_string(),
            "((b + 1) + (c * (a * 2)))"
        );
    }

    #[test]
    fn empty_table_still_walks() {
        #[derive(Debug)]
        struct Opaque;

        impl arbor_ast::ExtensionNode for Opaque {
            fn kind_name(&self) -> &str {
                "Opaque"
            }

            fn ty(&self) -> Type {
                Type::Int
            }
        }

        let tree = Expr::add(Expr::constant(1), Expr::extension(Opaque));
        let by_where = tree.replace_where(|_| None);
        let by_table = tree.replace_all(&ReplacementTable::new());
        assert!(matches!(
            by_where,
            Err(TraverseError::UnsupportedNode(ref kind)) if kind == "Opaque"
        ));
        assert!(matches!(
            by_table,
            Err(TraverseError::UnsupportedNode(ref kind)) if kind == "Opaque"
        ));
    }

    #[test]
    fn identity_not_name() {
        let x1 = Parameter::new("x", Type::Int);
        let x2 = Parameter::new("x", Type::Int);
        let tree = Expr::add(x1.expr(), x2.expr());

        let replaced = tree.replace_one(x2.as_expr(), &Expr::constant(2)).unwrap();
        assert_eq!(replaced.to_string(), "(x + 2)");
    }

    #[test]
    fn replace_root() {
        let x = Parameter::new("x", Type::Int);
        let tree = Expr::negate(x.expr());
        let other = Expr::constant(3);
        assert!(tree.replace_one(&tree, &other).unwrap().ptr_eq(&other));
    }

    #[test]
    fn missing_arguments() {
        let tree = Expr::constant(1);
        assert!(matches!(
            replace_one(&tree, None, Some(&tree)),
            Err(TraverseError::InvalidArgument("target"))
        ));
        assert!(matches!(
            replace_one(&tree, Some(&tree), None),
            Err(TraverseError::InvalidArgument("replacement"))
        ));
    }

    /// One node of every composite kind, each mentioning `leaf` somewhere below it.
    fn every_kind(leaf: &Parameter) -> Vec<Expr> {
        let l = || leaf.expr();
        let point = Type::named("Point");
        let exit = LabelTarget::new(Some("exit"), Type::Int);
        let brk = LabelTarget::named("brk");
        let add = MethodRef::method(Type::named("Bag"), "Add", [Type::Int], Type::Void);

        vec![
            Expr::typed_unary(UnaryOp::Convert, l(), Type::Float),
            Expr::binary(BinaryOp::SubtractChecked, l(), Expr::constant(1)),
            Expr::conditional(Expr::constant(true), l(), Expr::constant(0)),
            Expr::call(
                Some(l()),
                MethodRef::method(Type::Int, "Abs", [], Type::Int),
                vec![],
            ),
            Expr::invoke(
                Expr::lambda(l(), vec![Parameter::new("q", Type::Int)]),
                vec![Expr::constant(0)],
            ),
            Expr::lambda(Expr::add(l(), l()), vec![Parameter::new("q", Type::Int)]),
            Expr::list_init(
                Expr::new_object(ConstructorRef::new(Type::named("Bag"), []), vec![]),
                vec![ElementInit {
                    add_method: add,
                    arguments: vec![l()],
                }],
            )
            .unwrap(),
            Expr::member(Some(l()), MemberRef::property(Type::Int, "Bits", Type::Int)),
            Expr::new_object(ConstructorRef::new(point.clone(), [Type::Int]), vec![l()]),
            Expr::new_array_bounds(Type::Int, vec![l()]),
            Expr::type_is(l(), point),
            Expr::block(vec![Parameter::new("t", Type::Int)], vec![l()]),
            Expr::dynamic(Binder::new("Op"), Type::Object, vec![l()]),
            Expr::goto(GotoKind::Return, exit.clone(), Some(l())),
            Expr::index(
                Expr::new_array_init(Type::Int, vec![l()]),
                IndexerRef::new(Type::array(Type::Int), [Type::Int], Type::Int),
                vec![Expr::constant(0)],
            ),
            Expr::label(exit, Some(l())),
            Expr::loop_with(l(), Some(brk), None),
            Expr::switch(
                l(),
                None,
                vec![SwitchCase {
                    test_values: vec![Expr::constant(1)],
                    body: l(),
                }],
                Some(MethodRef::function("eq", [Type::Int, Type::Int], Type::Bool)),
            ),
            Expr::try_catch(
                Expr::constant(0),
                Some(l()),
                vec![CatchBlock {
                    test: Type::Object,
                    variable: None,
                    filter: Some(Expr::less_than(l(), Expr::constant(0))),
                    body: l(),
                }],
            ),
        ]
    }

    #[test]
    fn rebuild_preserves_kind_and_metadata() {
        let leaf = Parameter::new("leaf", Type::Int);
        let five = Expr::constant(5);

        for tree in every_kind(&leaf) {
            let replaced = tree.replace_one(leaf.as_expr(), &five).unwrap();
            assert!(!replaced.ptr_eq(&tree), "{tree} was not rebuilt");
            assert_eq!(replaced.kind_name(), tree.kind_name());
            assert_eq!(replaced.ty(), tree.ty(), "type of {tree} changed");
            assert_eq!(replaced.to_string(), tree.to_string().replace("leaf", "5"));

            match (tree.kind(), replaced.kind()) {
                (ExprKind::Unary(a), ExprKind::Unary(b)) => {
                    assert_eq!((a.op, &a.ty), (b.op, &b.ty));
                }
                (ExprKind::Binary(a), ExprKind::Binary(b)) => assert_eq!(a.op, b.op),
                (ExprKind::Call(a), ExprKind::Call(b)) => assert_eq!(a.method, b.method),
                (ExprKind::Lambda(a), ExprKind::Lambda(b)) => {
                    assert_eq!(a.parameters, b.parameters);
                    assert_eq!(a.name, b.name);
                    assert_eq!(a.tail_call, b.tail_call);
                    assert_eq!(a.return_type, b.return_type);
                }
                (ExprKind::ListInit(a), ExprKind::ListInit(b)) => {
                    assert!(a.new.ptr_eq(&b.new));
                    assert_eq!(a.initializers[0].add_method, b.initializers[0].add_method);
                }
                (ExprKind::Member(a), ExprKind::Member(b)) => assert_eq!(a.member, b.member),
                (ExprKind::New(a), ExprKind::New(b)) => {
                    assert_eq!(a.constructor, b.constructor);
                    assert_eq!(a.members, b.members);
                }
                (ExprKind::NewArray(a), ExprKind::NewArray(b)) => {
                    assert_eq!((a.kind, &a.element_type), (b.kind, &b.element_type));
                }
                (ExprKind::TypeBinary(a), ExprKind::TypeBinary(b)) => {
                    assert_eq!((a.kind, &a.type_operand), (b.kind, &b.type_operand));
                }
                (ExprKind::Block(a), ExprKind::Block(b)) => {
                    assert_eq!(a.variables, b.variables);
                    assert_eq!(a.ty, b.ty);
                }
                (ExprKind::Dynamic(a), ExprKind::Dynamic(b)) => {
                    assert_eq!((&a.binder, &a.ty), (&b.binder, &b.ty));
                }
                (ExprKind::Goto(a), ExprKind::Goto(b)) => {
                    assert_eq!((a.kind, &a.target, &a.ty), (b.kind, &b.target, &b.ty));
                }
                (ExprKind::Index(a), ExprKind::Index(b)) => assert_eq!(a.indexer, b.indexer),
                (ExprKind::Label(a), ExprKind::Label(b)) => assert_eq!(a.target, b.target),
                (ExprKind::Loop(a), ExprKind::Loop(b)) => {
                    assert_eq!(a.break_label, b.break_label);
                    assert_eq!(a.continue_label, b.continue_label);
                }
                (ExprKind::Switch(a), ExprKind::Switch(b)) => {
                    assert_eq!(a.comparison, b.comparison);
                    assert_eq!(a.ty, b.ty);
                }
                (ExprKind::Try(a), ExprKind::Try(b)) => {
                    assert_eq!(a.handlers[0].test, b.handlers[0].test);
                    assert!(a.body.ptr_eq(&b.body));
                }
                (ExprKind::Conditional(a), ExprKind::Conditional(b)) => {
                    assert!(a.test.ptr_eq(&b.test));
                }
                (ExprKind::Invocation(a), ExprKind::Invocation(b)) => {
                    assert!(a.arguments[0].ptr_eq(&b.arguments[0]));
                }
                (a, b) => panic!("unexpected kinds {} and {}", a.name(), b.name()),
            }
        }
    }

    #[test]
    fn runtime_variables_accept_parameters_only() {
        let a = Parameter::new("a", Type::Int);
        let b = Parameter::new("b", Type::Int);
        let tree = Expr::runtime_variables(vec![a.clone()]);

        let swapped = tree.replace_one(a.as_expr(), b.as_expr()).unwrap();
        assert_eq!(swapped.to_string(), "RuntimeVariables(b)");

        assert!(matches!(
            tree.replace_one(a.as_expr(), &Expr::constant(0)),
            Err(TraverseError::Model(_))
        ));
    }
}
