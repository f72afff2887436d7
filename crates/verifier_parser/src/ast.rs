//! The AST wire format produced by the external C-subset parser.
//!
//! Mirrors `original_source/cast.py`'s `AstNode`/`AstType`/`AstRange`: a JSON
//! document whose root is a `translation_unit`, every node carrying a `type`,
//! an optional `text`, a `range`, and a `children` array (spec.md §6).

use serde::Deserialize;
use verifier_base::AstRange;

/// The grammar's terminal and nonterminal kinds, exactly as enumerated in
/// spec.md §6 (keywords, punctuation, operators, and productions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum AstType {
    // Punctuation
    #[serde(rename = "(")]
    ParenLeft,
    #[serde(rename = ")")]
    ParenRight,
    #[serde(rename = "[")]
    BracketLeft,
    #[serde(rename = "]")]
    BracketRight,
    #[serde(rename = "{")]
    BraceLeft,
    #[serde(rename = "}")]
    BraceRight,
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "-")]
    Minus,
    #[serde(rename = "*")]
    Mult,
    #[serde(rename = "/")]
    Div,
    #[serde(rename = "%")]
    Mod,
    #[serde(rename = ",")]
    Comma,
    #[serde(rename = ";")]
    Semicolon,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "!")]
    Not,
    #[serde(rename = "~")]
    Neg,
    #[serde(rename = ":")]
    Colon,
    #[serde(rename = "?")]
    Question,

    // Keywords
    #[serde(rename = "EXTERN")]
    Extern,
    #[serde(rename = "ELSE")]
    Else,
    #[serde(rename = "IF")]
    If,
    #[serde(rename = "SWITCH")]
    Switch,
    #[serde(rename = "WHILE")]
    While,
    #[serde(rename = "FOR")]
    For,
    #[serde(rename = "DO")]
    Do,
    #[serde(rename = "CONTINUE")]
    Continue,
    #[serde(rename = "BREAK")]
    Break,
    #[serde(rename = "GOTO")]
    Goto,
    #[serde(rename = "RETURN")]
    Return,
    #[serde(rename = "CASE")]
    Case,
    #[serde(rename = "DEFAULT")]
    Default,
    #[serde(rename = "INT")]
    Int,
    #[serde(rename = "FLOAT")]
    Float,
    #[serde(rename = "BOOL")]
    Bool,
    #[serde(rename = "VOID")]
    Void,

    // Multi-char operators
    #[serde(rename = "NE_OP")]
    NeOp,
    #[serde(rename = "GE_OP")]
    GeOp,
    #[serde(rename = "RIGHT_OP")]
    RightOp,
    #[serde(rename = "LEFT_OP")]
    LeftOp,
    #[serde(rename = "LE_OP")]
    LeOp,
    #[serde(rename = "EQ_OP")]
    EqOp,
    #[serde(rename = "OR_OP")]
    OrOp,
    #[serde(rename = "AND_OP")]
    AndOp,
    #[serde(rename = "MUL_ASSIGN")]
    MulAssign,
    #[serde(rename = "DIV_ASSIGN")]
    DivAssign,
    #[serde(rename = "MOD_ASSIGN")]
    ModAssign,
    #[serde(rename = "ADD_ASSIGN")]
    AddAssign,
    #[serde(rename = "SUB_ASSIGN")]
    SubAssign,
    #[serde(rename = "LEFT_ASSIGN")]
    LeftAssign,
    #[serde(rename = "RIGHT_ASSIGN")]
    RightAssign,
    #[serde(rename = "AND_ASSIGN")]
    AndAssign,
    #[serde(rename = "XOR_ASSIGN")]
    XorAssign,
    #[serde(rename = "OR_ASSIGN")]
    OrAssign,
    #[serde(rename = "INC_OP")]
    IncOp,
    #[serde(rename = "DEC_OP")]
    DecOp,

    // Leaves with text payloads
    #[serde(rename = "CONSTANT")]
    Constant,
    #[serde(rename = "IDENTIFIER")]
    Identifier,

    // Productions
    #[serde(rename = "translation_unit")]
    TranslationUnit,
    #[serde(rename = "function_definition")]
    FunctionDefinition,
    #[serde(rename = "declaration")]
    Declaration,
    #[serde(rename = "init_declarator")]
    InitDeclarator,
    #[serde(rename = "direct_declarator")]
    DirectDeclarator,
    #[serde(rename = "parameter_list")]
    ParameterList,
    #[serde(rename = "parameter_declaration")]
    ParameterDeclaration,
    #[serde(rename = "declaration_specifiers")]
    DeclarationSpecifiers,
    #[serde(rename = "compound_statement")]
    CompoundStatement,
    #[serde(rename = "block_item_list")]
    BlockItemList,
    #[serde(rename = "expression_statement")]
    ExpressionStatement,
    #[serde(rename = "selection_statement")]
    SelectionStatement,
    #[serde(rename = "iteration_statement")]
    IterationStatement,
    #[serde(rename = "jump_statement")]
    JumpStatement,
    #[serde(rename = "labeled_statement")]
    LabeledStatement,
    #[serde(rename = "primary_expression")]
    PrimaryExpression,
    #[serde(rename = "postfix_expression")]
    PostfixExpression,
    #[serde(rename = "argument_expression_list")]
    ArgumentExpressionList,
    #[serde(rename = "unary_expression")]
    UnaryExpression,
    #[serde(rename = "cast_expression")]
    CastExpression,
    #[serde(rename = "multiplicative_expression")]
    MultiplicativeExpression,
    #[serde(rename = "additive_expression")]
    AdditiveExpression,
    #[serde(rename = "shift_expression")]
    ShiftExpression,
    #[serde(rename = "relational_expression")]
    RelationalExpression,
    #[serde(rename = "equality_expression")]
    EqualityExpression,
    #[serde(rename = "and_expression")]
    AndExpression,
    #[serde(rename = "exclusive_or_expression")]
    ExclusiveOrExpression,
    #[serde(rename = "inclusive_or_expression")]
    InclusiveOrExpression,
    #[serde(rename = "logical_and_expression")]
    LogicalAndExpression,
    #[serde(rename = "logical_or_expression")]
    LogicalOrExpression,
    #[serde(rename = "conditional_expression")]
    ConditionalExpression,
    #[serde(rename = "assignment_expression")]
    AssignmentExpression,
}

impl AstType {
    pub fn as_str(&self) -> &'static str {
        // Mirrors AstType's value in original_source/cast.py for diagnostics.
        use AstType::*;
        match self {
            ParenLeft => "(",
            ParenRight => ")",
            BracketLeft => "[",
            BracketRight => "]",
            BraceLeft => "{",
            BraceRight => "}",
            Plus => "+",
            Minus => "-",
            Mult => "*",
            Div => "/",
            Mod => "%",
            Comma => ",",
            Semicolon => ";",
            Lt => "<",
            Eq => "=",
            Gt => ">",
            Not => "!",
            Neg => "~",
            Colon => ":",
            Question => "?",
            Extern => "EXTERN",
            Else => "ELSE",
            If => "IF",
            Switch => "SWITCH",
            While => "WHILE",
            For => "FOR",
            Do => "DO",
            Continue => "CONTINUE",
            Break => "BREAK",
            Goto => "GOTO",
            Return => "RETURN",
            Case => "CASE",
            Default => "DEFAULT",
            Int => "INT",
            Float => "FLOAT",
            Bool => "BOOL",
            Void => "VOID",
            NeOp => "NE_OP",
            GeOp => "GE_OP",
            RightOp => "RIGHT_OP",
            LeftOp => "LEFT_OP",
            LeOp => "LE_OP",
            EqOp => "EQ_OP",
            OrOp => "OR_OP",
            AndOp => "AND_OP",
            MulAssign => "MUL_ASSIGN",
            DivAssign => "DIV_ASSIGN",
            ModAssign => "MOD_ASSIGN",
            AddAssign => "ADD_ASSIGN",
            SubAssign => "SUB_ASSIGN",
            LeftAssign => "LEFT_ASSIGN",
            RightAssign => "RIGHT_ASSIGN",
            AndAssign => "AND_ASSIGN",
            XorAssign => "XOR_ASSIGN",
            OrAssign => "OR_ASSIGN",
            IncOp => "INC_OP",
            DecOp => "DEC_OP",
            Constant => "CONSTANT",
            Identifier => "IDENTIFIER",
            TranslationUnit => "translation_unit",
            FunctionDefinition => "function_definition",
            Declaration => "declaration",
            InitDeclarator => "init_declarator",
            DirectDeclarator => "direct_declarator",
            ParameterList => "parameter_list",
            ParameterDeclaration => "parameter_declaration",
            DeclarationSpecifiers => "declaration_specifiers",
            CompoundStatement => "compound_statement",
            BlockItemList => "block_item_list",
            ExpressionStatement => "expression_statement",
            SelectionStatement => "selection_statement",
            IterationStatement => "iteration_statement",
            JumpStatement => "jump_statement",
            LabeledStatement => "labeled_statement",
            PrimaryExpression => "primary_expression",
            PostfixExpression => "postfix_expression",
            ArgumentExpressionList => "argument_expression_list",
            UnaryExpression => "unary_expression",
            CastExpression => "cast_expression",
            MultiplicativeExpression => "multiplicative_expression",
            AdditiveExpression => "additive_expression",
            ShiftExpression => "shift_expression",
            RelationalExpression => "relational_expression",
            EqualityExpression => "equality_expression",
            AndExpression => "and_expression",
            ExclusiveOrExpression => "exclusive_or_expression",
            InclusiveOrExpression => "inclusive_or_expression",
            LogicalAndExpression => "logical_and_expression",
            LogicalOrExpression => "logical_or_expression",
            ConditionalExpression => "conditional_expression",
            AssignmentExpression => "assignment_expression",
        }
    }
}

/// Raw JSON shape of a range, matched field-for-field against spec.md §6.
#[derive(Debug, Clone, Copy, Deserialize)]
struct RawRange {
    #[serde(rename = "startLineNumber")]
    start_line_number: u32,
    #[serde(rename = "startColumn")]
    start_column: u32,
    #[serde(rename = "endLineNumber")]
    end_line_number: u32,
    #[serde(rename = "endColumn")]
    end_column: u32,
}

impl From<RawRange> for AstRange {
    fn from(r: RawRange) -> Self {
        AstRange::new(
            r.start_line_number,
            r.start_column,
            r.end_line_number,
            r.end_column,
        )
    }
}

/// One node of the Parser's syntax tree.
#[derive(Debug, Clone, Deserialize)]
pub struct AstNode {
    #[serde(rename = "type")]
    pub ty: AstType,
    pub text: Option<String>,
    range: RawRange,
    #[serde(default)]
    pub children: Vec<AstNode>,
}

impl AstNode {
    pub fn range(&self) -> AstRange {
        self.range.into()
    }

    /// Indexed child access, mirroring Python's `ast[i]` (`cast.py::AstNode.__getitem__`).
    pub fn child(&self, index: usize) -> &AstNode {
        &self.children[index]
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl std::ops::Index<usize> for AstNode {
    type Output = AstNode;
    fn index(&self, index: usize) -> &AstNode {
        &self.children[index]
    }
}

/// Parses a Parser JSON document (spec.md §6) into an [`AstNode`] tree.
pub fn parse(json: &str) -> serde_json::Result<AstNode> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range_json() -> &'static str {
        r#""range":{"startLineNumber":1,"startColumn":0,"endLineNumber":1,"endColumn":1}"#
    }

    #[test]
    fn parses_leaf_identifier() {
        let json = format!(
            r#"{{"type":"IDENTIFIER","text":"x",{},"children":[]}}"#,
            range_json()
        );
        let node = parse(&json).unwrap();
        assert_eq!(node.ty, AstType::Identifier);
        assert_eq!(node.text.as_deref(), Some("x"));
        assert!(node.is_empty());
    }

    #[test]
    fn parses_nested_children_and_indexing() {
        let json = format!(
            r#"{{"type":"relational_expression","text":null,{r},"children":[
                {{"type":"IDENTIFIER","text":"a",{r},"children":[]}},
                {{"type":">","text":">",{r},"children":[]}},
                {{"type":"IDENTIFIER","text":"b",{r},"children":[]}}
            ]}}"#,
            r = range_json()
        );
        let node = parse(&json).unwrap();
        assert_eq!(node.ty, AstType::RelationalExpression);
        assert_eq!(node.len(), 3);
        assert_eq!(node[1].ty, AstType::Gt);
        assert_eq!(node.child(0).text.as_deref(), Some("a"));
    }

    #[test]
    fn range_converts_to_ast_range() {
        let json = format!(
            r#"{{"type":"IDENTIFIER","text":"x","range":{{"startLineNumber":3,"startColumn":1,"endLineNumber":3,"endColumn":2}},"children":[]}}"#
        );
        let node = parse(&json).unwrap();
        let r = node.range();
        assert_eq!(r.start_line, 3);
        assert_eq!(r.end_column, 2);
    }

    #[test]
    fn as_str_round_trips_production_names() {
        assert_eq!(AstType::FunctionDefinition.as_str(), "function_definition");
        assert_eq!(AstType::Identifier.as_str(), "IDENTIFIER");
    }
}
