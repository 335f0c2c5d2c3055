use arbor_ast::Expr;

/// What a traversal callback wants done with the node it was just shown.
///
/// The default keeps the node, descends into its children and does not abort. A callback
/// returning `None` is treated as returning the default.
#[derive(Debug, Clone)]
pub struct Decision {
    /// Continue with this node in place of the visited one.
    pub replacement: Option<Expr>,
    /// Visit the children of the (possibly replaced) node.
    pub descend: bool,
    /// Stop the whole traversal after this node. Nothing else is offered to the callback.
    pub abort: bool,
}

impl Default for Decision {
    fn default() -> Self {
        Self {
            replacement: None,
            descend: true,
            abort: false,
        }
    }
}

impl Decision {
    pub fn keep() -> Self {
        Self::default()
    }

    /// Replace the node and still descend into the replacement.
    pub fn replace(with: Expr) -> Self {
        Self {
            replacement: Some(with),
            ..Self::default()
        }
    }

    /// Keep the node but leave its children unvisited.
    pub fn skip() -> Self {
        Self {
            descend: false,
            ..Self::default()
        }
    }

    pub fn without_descent(self) -> Self {
        Self {
            descend: false,
            ..self
        }
    }

    pub fn and_abort(self) -> Self {
        Self {
            abort: true,
            ..self
        }
    }
}

/// The result of traversing a tree, or a subtree of one.
#[derive(Debug, Clone)]
pub struct Outcome {
    /// The rebuilt tree, `None` only when the traversed root was absent.
    pub node: Option<Expr>,
    /// Whether every node of the subtree was offered to the callback.
    pub fully_visited: bool,
}

impl Outcome {
    /// A node whose entire subtree was visited.
    pub fn visited(node: Expr) -> Self {
        Self {
            node: Some(node),
            fully_visited: true,
        }
    }

    /// An absent optional slot, which is vacuously fully visited.
    pub fn vacuous() -> Self {
        Self {
            node: None,
            fully_visited: true,
        }
    }

    /// A node whose traversal was cut short by an abort.
    pub fn partial(node: Expr) -> Self {
        Self {
            node: Some(node),
            fully_visited: false,
        }
    }

    pub fn into_node(self) -> Option<Expr> {
        self.node
    }
}
