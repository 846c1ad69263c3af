use tracing::debug;

use crate::{
    ast::{ExprType, IdentifierTypes, Node},
    compiler,
    error::{CompileError, InternalError, SelectorError},
    evaluator::Evaluator,
    parser,
    properties::PropertySource,
    typecheck::{self, TypeChecker, TypeTable},
};

/// A compiled message selector.
///
/// Construction tokenizes, parses and type checks the text and compiles its
/// `LIKE` patterns, so a selector that builds is ready to be matched against
/// any number of messages, from any number of threads.
///
/// # Examples
///
/// ```
/// use selector_lang::{Properties, Selector};
///
/// let selector = Selector::new("JMSType = 'car' AND weight > 2500").unwrap();
///
/// let heavy = Properties::new().with("JMSType", "car").with("weight", 3000);
/// let light = Properties::new().with("JMSType", "car").with("weight", 1000);
///
/// assert!(selector.matches(&heavy).unwrap());
/// assert!(!selector.matches(&light).unwrap());
/// assert!(!selector.matches(&Properties::new()).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct Selector {
    source: String,
    tree: Node,
    types: TypeTable,
    evaluator: Evaluator,
    root_type: ExprType,
}

impl Selector {
    /// Builds a selector with no identifier type hints.
    pub fn new(expr: &str) -> Result<Self, SelectorError> {
        Self::with_types(expr, &IdentifierTypes::new())
    }

    /// Builds a selector, typing identifiers by `hints`. Unhinted identifiers
    /// are `any`.
    pub fn with_types(expr: &str, hints: &IdentifierTypes) -> Result<Self, SelectorError> {
        let tree = parser::parse(expr)?;
        let types = TypeChecker::new(hints).check(&tree)?;
        let root_type = typecheck::accept(&tree, &types)?;
        let evaluator = Evaluator::new(&tree)?;

        Ok(Selector {
            source: expr.to_string(),
            tree,
            types,
            evaluator,
            root_type,
        })
    }

    /// Evaluates against one message. `UNKNOWN` does not match.
    pub fn matches(&self, props: &dyn PropertySource) -> Result<bool, InternalError> {
        self.evaluator.evaluate(&self.tree, &self.types, props)
    }

    /// Generates the term program for this selector.
    pub fn compile(&self) -> Result<String, CompileError> {
        let program = compiler::compile(&self.tree)?;
        debug!(selector = %self.source, program = %program, "selector compiled");
        Ok(program)
    }

    /// `bool`, or `any` when the result depends on unhinted identifiers.
    pub fn root_type(&self) -> ExprType {
        self.root_type
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tree(&self) -> &Node {
        &self.tree
    }

    pub fn types(&self) -> &TypeTable {
        &self.types
    }

    /// Fully parenthesized re-print of the selector.
    pub fn canonical(&self) -> String {
        self.tree.to_string()
    }
}

#[test]
fn test_selector_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Selector>();
}
