//! Structural dump of a Python module.
//!
//! Walks the AST in a fixed pre-order and writes each node as
//! `Kind`, `Kind:label` or `Kind:label(child,child,...)`. Missing optional
//! children are written as `_`; source positions are never written.

use ruff_python_ast::{self as ast, Expr, Pattern, Stmt};
use ruff_text_size::Ranged;

/// Placeholder for an absent optional child.
const ABSENT: &str = "_";

/// Serializes a parsed module into its canonical string.
pub(crate) fn dump_module(module: &ast::ModModule, source: &str) -> String {
    let mut dumper = Dumper::new(source);
    dumper.node("Module", None, |d| d.body(&module.body));
    dumper.out
}

struct Dumper<'src> {
    source: &'src str,
    out: String,
    /// One entry per open child list: `true` until the first child is written.
    first_child: Vec<bool>,
}

impl<'src> Dumper<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            source,
            out: String::with_capacity(source.len()),
            first_child: Vec::new(),
        }
    }

    fn separate(&mut self) {
        if let Some(first) = self.first_child.last_mut() {
            if *first {
                *first = false;
            } else {
                self.out.push(',');
            }
        }
    }

    fn head(&mut self, kind: &str, label: Option<&str>) {
        self.separate();
        self.out.push_str(kind);
        if let Some(label) = label {
            self.out.push(':');
            self.out.push_str(label);
        }
    }

    fn leaf(&mut self, kind: &str, label: Option<&str>) {
        self.head(kind, label);
    }

    /// Writes a node; the parentheses are dropped when no child was written.
    fn node(&mut self, kind: &str, label: Option<&str>, children: impl FnOnce(&mut Self)) {
        self.head(kind, label);
        let mark = self.out.len();
        self.out.push('(');
        self.first_child.push(true);
        children(self);
        let empty = self.first_child.pop().unwrap_or(true);
        if empty {
            self.out.truncate(mark);
        } else {
            self.out.push(')');
        }
    }

    fn absent(&mut self) {
        self.leaf(ABSENT, None);
    }

    fn quoted(&mut self, kind: &str, text: &str) {
        let label = quote(text);
        self.leaf(kind, Some(&label));
    }

    fn source_text(&mut self, kind: &str, node: &impl Ranged) {
        let source = self.source;
        self.quoted(kind, &source[node.range()]);
    }

    fn body(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.stmt(stmt);
        }
    }

    fn group(&mut self, kind: &str, stmts: &[Stmt]) {
        if !stmts.is_empty() {
            self.node(kind, None, |d| d.body(stmts));
        }
    }

    fn exprs(&mut self, exprs: &[Expr]) {
        for expr in exprs {
            self.expr(expr);
        }
    }

    fn opt_expr(&mut self, expr: Option<&Expr>) {
        match expr {
            Some(expr) => self.expr(expr),
            None => self.absent(),
        }
    }

    #[allow(clippy::too_many_lines)]
    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::FunctionDef(f) => {
                let kind = if f.is_async {
                    "AsyncFunctionDef"
                } else {
                    "FunctionDef"
                };
                self.node(kind, Some(f.name.as_str()), |d| {
                    d.decorators(&f.decorator_list);
                    if let Some(type_params) = &f.type_params {
                        d.type_params(type_params);
                    }
                    d.parameters(&f.parameters);
                    if let Some(returns) = &f.returns {
                        d.node("Returns", None, |d| d.expr(returns));
                    }
                    d.group("Body", &f.body);
                });
            }
            Stmt::ClassDef(c) => {
                self.node("ClassDef", Some(c.name.as_str()), |d| {
                    d.decorators(&c.decorator_list);
                    if let Some(type_params) = &c.type_params {
                        d.type_params(type_params);
                    }
                    // `class A():` and `class A:` are the same class.
                    if let Some(arguments) = c
                        .arguments
                        .as_deref()
                        .filter(|a| !a.args.is_empty() || !a.keywords.is_empty())
                    {
                        d.node("Bases", None, |d| d.arguments(arguments));
                    }
                    d.group("Body", &c.body);
                });
            }
            Stmt::Return(r) => self.node("Return", None, |d| {
                if let Some(value) = &r.value {
                    d.expr(value);
                }
            }),
            Stmt::Delete(del) => self.node("Delete", None, |d| d.exprs(&del.targets)),
            Stmt::Assign(a) => self.node("Assign", None, |d| {
                d.node("Targets", None, |d| d.exprs(&a.targets));
                d.expr(&a.value);
            }),
            Stmt::AugAssign(a) => {
                let op = format!("{}=", operator_symbol(a.op));
                self.node("AugAssign", Some(&op), |d| {
                    d.expr(&a.target);
                    d.expr(&a.value);
                });
            }
            Stmt::AnnAssign(a) => self.node("AnnAssign", None, |d| {
                d.expr(&a.target);
                d.expr(&a.annotation);
                d.opt_expr(a.value.as_deref());
            }),
            Stmt::TypeAlias(t) => self.node("TypeAlias", None, |d| {
                d.expr(&t.name);
                if let Some(type_params) = &t.type_params {
                    d.type_params(type_params);
                }
                d.expr(&t.value);
            }),
            Stmt::For(f) => {
                let kind = if f.is_async { "AsyncFor" } else { "For" };
                self.node(kind, None, |d| {
                    d.expr(&f.target);
                    d.expr(&f.iter);
                    d.group("Body", &f.body);
                    d.group("OrElse", &f.orelse);
                });
            }
            Stmt::While(w) => self.node("While", None, |d| {
                d.expr(&w.test);
                d.group("Body", &w.body);
                d.group("OrElse", &w.orelse);
            }),
            Stmt::If(i) => self.node("If", None, |d| {
                d.expr(&i.test);
                d.group("Body", &i.body);
                for clause in &i.elif_else_clauses {
                    match &clause.test {
                        Some(test) => d.node("Elif", None, |d| {
                            d.expr(test);
                            d.body(&clause.body);
                        }),
                        None => d.node("Else", None, |d| d.body(&clause.body)),
                    }
                }
            }),
            Stmt::With(w) => {
                let kind = if w.is_async { "AsyncWith" } else { "With" };
                self.node(kind, None, |d| {
                    for item in &w.items {
                        d.node("WithItem", None, |d| {
                            d.expr(&item.context_expr);
                            if let Some(vars) = &item.optional_vars {
                                d.expr(vars);
                            }
                        });
                    }
                    d.group("Body", &w.body);
                });
            }
            Stmt::Match(m) => self.node("Match", None, |d| {
                d.expr(&m.subject);
                for case in &m.cases {
                    d.node("Case", None, |d| {
                        d.pattern(&case.pattern);
                        if let Some(guard) = &case.guard {
                            d.node("Guard", None, |d| d.expr(guard));
                        }
                        d.group("Body", &case.body);
                    });
                }
            }),
            Stmt::Raise(r) => self.node("Raise", None, |d| {
                d.opt_expr(r.exc.as_deref());
                if let Some(cause) = &r.cause {
                    d.node("From", None, |d| d.expr(cause));
                }
            }),
            Stmt::Try(t) => {
                let kind = if t.is_star { "TryStar" } else { "Try" };
                self.node(kind, None, |d| {
                    d.group("Body", &t.body);
                    for handler in &t.handlers {
                        let ast::ExceptHandler::ExceptHandler(h) = handler;
                        d.node("Except", h.name.as_ref().map(ast::Identifier::as_str), |d| {
                            d.opt_expr(h.type_.as_deref());
                            d.body(&h.body);
                        });
                    }
                    d.group("OrElse", &t.orelse);
                    d.group("Finally", &t.finalbody);
                });
            }
            Stmt::Assert(a) => self.node("Assert", None, |d| {
                d.expr(&a.test);
                if let Some(msg) = &a.msg {
                    d.expr(msg);
                }
            }),
            Stmt::Import(i) => self.node("Import", None, |d| d.aliases(&i.names)),
            Stmt::ImportFrom(i) => {
                let module = format!(
                    "{}{}",
                    ".".repeat(i.level as usize),
                    i.module.as_ref().map_or("", ast::Identifier::as_str)
                );
                self.node("ImportFrom", Some(&module), |d| d.aliases(&i.names));
            }
            Stmt::Global(g) => self.node("Global", None, |d| {
                for name in &g.names {
                    d.leaf("Name", Some(name.as_str()));
                }
            }),
            Stmt::Nonlocal(n) => self.node("Nonlocal", None, |d| {
                for name in &n.names {
                    d.leaf("Name", Some(name.as_str()));
                }
            }),
            Stmt::Expr(e) => self.node("Expr", None, |d| d.expr(&e.value)),
            Stmt::Pass(_) => self.leaf("Pass", None),
            Stmt::Break(_) => self.leaf("Break", None),
            Stmt::Continue(_) => self.leaf("Continue", None),
            Stmt::IpyEscapeCommand(cmd) => self.source_text("IpyEscape", cmd),
        }
    }

    #[allow(clippy::too_many_lines)]
    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::BoolOp(b) => {
                let op = match b.op {
                    ast::BoolOp::And => "and",
                    ast::BoolOp::Or => "or",
                };
                self.node("BoolOp", Some(op), |d| d.exprs(&b.values));
            }
            Expr::Named(n) => self.node("NamedExpr", None, |d| {
                d.expr(&n.target);
                d.expr(&n.value);
            }),
            Expr::BinOp(b) => self.node("BinOp", Some(operator_symbol(b.op)), |d| {
                d.expr(&b.left);
                d.expr(&b.right);
            }),
            Expr::UnaryOp(u) => {
                let op = match u.op {
                    ast::UnaryOp::Invert => "~",
                    ast::UnaryOp::Not => "not",
                    ast::UnaryOp::UAdd => "+",
                    ast::UnaryOp::USub => "-",
                };
                self.node("UnaryOp", Some(op), |d| d.expr(&u.operand));
            }
            Expr::Lambda(l) => self.node("Lambda", None, |d| {
                if let Some(parameters) = &l.parameters {
                    d.parameters(parameters);
                }
                d.expr(&l.body);
            }),
            Expr::If(i) => self.node("IfExp", None, |d| {
                d.expr(&i.test);
                d.expr(&i.body);
                d.expr(&i.orelse);
            }),
            Expr::Dict(dict) => self.node("Dict", None, |d| {
                for item in &dict.items {
                    match &item.key {
                        Some(key) => d.node("Item", None, |d| {
                            d.expr(key);
                            d.expr(&item.value);
                        }),
                        None => d.node("Unpack", None, |d| d.expr(&item.value)),
                    }
                }
            }),
            Expr::Set(s) => self.node("Set", None, |d| d.exprs(&s.elts)),
            Expr::ListComp(c) => self.node("ListComp", None, |d| {
                d.expr(&c.elt);
                d.comprehensions(&c.generators);
            }),
            Expr::SetComp(c) => self.node("SetComp", None, |d| {
                d.expr(&c.elt);
                d.comprehensions(&c.generators);
            }),
            Expr::DictComp(c) => self.node("DictComp", None, |d| {
                d.expr(&c.key);
                d.expr(&c.value);
                d.comprehensions(&c.generators);
            }),
            Expr::Generator(g) => self.node("GeneratorExp", None, |d| {
                d.expr(&g.elt);
                d.comprehensions(&g.generators);
            }),
            Expr::Await(a) => self.node("Await", None, |d| d.expr(&a.value)),
            Expr::Yield(y) => self.node("Yield", None, |d| {
                if let Some(value) = &y.value {
                    d.expr(value);
                }
            }),
            Expr::YieldFrom(y) => self.node("YieldFrom", None, |d| d.expr(&y.value)),
            Expr::Compare(c) => {
                let ops = c
                    .ops
                    .iter()
                    .map(|op| cmp_symbol(*op))
                    .collect::<Vec<_>>()
                    .join(" ");
                self.node("Compare", Some(&ops), |d| {
                    d.expr(&c.left);
                    d.exprs(&c.comparators);
                });
            }
            Expr::Call(c) => self.node("Call", None, |d| {
                d.expr(&c.func);
                d.arguments(&c.arguments);
            }),
            Expr::FString(f) => self.node("JoinedStr", None, |d| {
                let mut pending = String::new();
                for part in &f.value {
                    match part {
                        ast::FStringPart::Literal(lit) => pending.push_str(lit),
                        ast::FStringPart::FString(fstring) => {
                            d.interpolated_into(&fstring.elements, &mut pending);
                        }
                    }
                }
                d.flush_literal(&mut pending);
            }),
            Expr::TString(t) => self.node("TemplateStr", None, |d| {
                let mut pending = String::new();
                for tstring in &t.value {
                    d.interpolated_into(&tstring.elements, &mut pending);
                }
                d.flush_literal(&mut pending);
            }),
            Expr::StringLiteral(s) => self.quoted("Str", s.value.to_str()),
            Expr::BytesLiteral(b) => {
                let bytes: Vec<u8> = b.value.bytes().collect();
                let label = format!("b\"{}\"", bytes.escape_ascii());
                self.leaf("Bytes", Some(&label));
            }
            Expr::NumberLiteral(n) => {
                let label = match &n.value {
                    ast::Number::Int(int) => int.to_string(),
                    ast::Number::Float(float) => format!("{float:?}"),
                    ast::Number::Complex { real, imag } => format!("{real:?}+{imag:?}j"),
                };
                self.leaf("Num", Some(&label));
            }
            Expr::BooleanLiteral(b) => {
                self.leaf("Const", Some(if b.value { "True" } else { "False" }));
            }
            Expr::NoneLiteral(_) => self.leaf("Const", Some("None")),
            Expr::EllipsisLiteral(_) => self.leaf("Const", Some("...")),
            Expr::Attribute(a) => {
                let label = with_context(a.attr.as_str(), a.ctx);
                self.node("Attribute", Some(&label), |d| d.expr(&a.value));
            }
            Expr::Subscript(s) => {
                let label = context_suffix(s.ctx);
                self.node("Subscript", label, |d| {
                    d.expr(&s.value);
                    d.expr(&s.slice);
                });
            }
            Expr::Starred(s) => {
                let label = context_suffix(s.ctx);
                self.node("Starred", label, |d| d.expr(&s.value));
            }
            Expr::Name(n) => {
                let label = with_context(n.id.as_str(), n.ctx);
                self.leaf("Name", Some(&label));
            }
            Expr::List(l) => {
                let label = context_suffix(l.ctx);
                self.node("List", label, |d| d.exprs(&l.elts));
            }
            Expr::Tuple(t) => {
                let label = context_suffix(t.ctx);
                self.node("Tuple", label, |d| d.exprs(&t.elts));
            }
            Expr::Slice(s) => self.node("Slice", None, |d| {
                d.opt_expr(s.lower.as_deref());
                d.opt_expr(s.upper.as_deref());
                d.opt_expr(s.step.as_deref());
            }),
            Expr::IpyEscapeCommand(cmd) => self.source_text("IpyEscape", cmd),
        }
    }

    fn interpolated(&mut self, elements: &ast::InterpolatedStringElements) {
        let mut pending = String::new();
        self.interpolated_into(elements, &mut pending);
        self.flush_literal(&mut pending);
    }

    /// Writes a run of adjacent literal pieces as a single `Str`.
    fn flush_literal(&mut self, pending: &mut String) {
        if !pending.is_empty() {
            let text = std::mem::take(pending);
            self.quoted("Str", &text);
        }
    }

    /// Literal pieces are appended to `pending` so that implicitly
    /// concatenated parts merge with their neighbours.
    fn interpolated_into(
        &mut self,
        elements: &ast::InterpolatedStringElements,
        pending: &mut String,
    ) {
        for element in elements {
            match element {
                ast::InterpolatedStringElement::Literal(lit) => pending.push_str(&lit.value),
                ast::InterpolatedStringElement::Interpolation(interp) => {
                    self.flush_literal(pending);
                    let conversion = match interp.conversion {
                        ast::ConversionFlag::None => None,
                        ast::ConversionFlag::Str => Some("!s"),
                        ast::ConversionFlag::Ascii => Some("!a"),
                        ast::ConversionFlag::Repr => Some("!r"),
                    };
                    let label = match (interp.debug_text.is_some(), conversion) {
                        (false, None) => None,
                        (debug, conversion) => Some(format!(
                            "{}{}",
                            if debug { "=" } else { "" },
                            conversion.unwrap_or("")
                        )),
                    };
                    self.node("FormattedValue", label.as_deref(), |d| {
                        d.expr(&interp.expression);
                        if let Some(spec) = &interp.format_spec {
                            d.node("FormatSpec", None, |d| d.interpolated(&spec.elements));
                        }
                    });
                }
            }
        }
    }

    fn comprehensions(&mut self, generators: &[ast::Comprehension]) {
        for generator in generators {
            let kind = if generator.is_async {
                "AsyncComprehension"
            } else {
                "Comprehension"
            };
            self.node(kind, None, |d| {
                d.expr(&generator.target);
                d.expr(&generator.iter);
                for condition in &generator.ifs {
                    d.node("If", None, |d| d.expr(condition));
                }
            });
        }
    }

    fn arguments(&mut self, arguments: &ast::Arguments) {
        self.exprs(&arguments.args);
        for keyword in &arguments.keywords {
            match &keyword.arg {
                Some(name) => self.node("Keyword", Some(name.as_str()), |d| d.expr(&keyword.value)),
                None => self.node("KwSplat", None, |d| d.expr(&keyword.value)),
            }
        }
    }

    fn decorators(&mut self, decorators: &[ast::Decorator]) {
        if !decorators.is_empty() {
            self.node("Decorators", None, |d| {
                for decorator in decorators {
                    d.expr(&decorator.expression);
                }
            });
        }
    }

    fn parameters(&mut self, parameters: &ast::Parameters) {
        self.node("Params", None, |d| {
            for param in &parameters.posonlyargs {
                d.parameter_with_default("PosOnly", param);
            }
            for param in &parameters.args {
                d.parameter_with_default("Arg", param);
            }
            if let Some(vararg) = &parameters.vararg {
                d.parameter("VarArg", vararg);
            }
            for param in &parameters.kwonlyargs {
                d.parameter_with_default("KwOnly", param);
            }
            if let Some(kwarg) = &parameters.kwarg {
                d.parameter("KwArg", kwarg);
            }
        });
    }

    fn parameter(&mut self, kind: &str, param: &ast::Parameter) {
        self.node(kind, Some(param.name.as_str()), |d| {
            if let Some(annotation) = &param.annotation {
                d.node("Annotation", None, |d| d.expr(annotation));
            }
        });
    }

    fn parameter_with_default(&mut self, kind: &str, param: &ast::ParameterWithDefault) {
        self.node(kind, Some(param.parameter.name.as_str()), |d| {
            if let Some(annotation) = &param.parameter.annotation {
                d.node("Annotation", None, |d| d.expr(annotation));
            }
            if let Some(default) = &param.default {
                d.node("Default", None, |d| d.expr(default));
            }
        });
    }

    fn type_params(&mut self, type_params: &ast::TypeParams) {
        self.node("TypeParams", None, |d| {
            for param in &type_params.type_params {
                match param {
                    ast::TypeParam::TypeVar(var) => d.node("TypeVar", Some(var.name.as_str()), |d| {
                        if let Some(bound) = &var.bound {
                            d.expr(bound);
                        }
                    }),
                    ast::TypeParam::ParamSpec(spec) => d.leaf("ParamSpec", Some(spec.name.as_str())),
                    ast::TypeParam::TypeVarTuple(tuple) => {
                        d.leaf("TypeVarTuple", Some(tuple.name.as_str()));
                    }
                }
            }
        });
    }

    fn aliases(&mut self, aliases: &[ast::Alias]) {
        for alias in aliases {
            let label = match &alias.asname {
                Some(asname) => format!("{} as {}", alias.name.as_str(), asname.as_str()),
                None => alias.name.as_str().to_owned(),
            };
            self.leaf("Alias", Some(&label));
        }
    }

    fn pattern(&mut self, pattern: &Pattern) {
        match pattern {
            Pattern::MatchValue(p) => self.node("MatchValue", None, |d| d.expr(&p.value)),
            Pattern::MatchSingleton(p) => {
                let value = match p.value {
                    ast::Singleton::None => "None",
                    ast::Singleton::True => "True",
                    ast::Singleton::False => "False",
                };
                self.leaf("MatchSingleton", Some(value));
            }
            Pattern::MatchSequence(p) => self.node("MatchSequence", None, |d| {
                for sub in &p.patterns {
                    d.pattern(sub);
                }
            }),
            Pattern::MatchMapping(p) => {
                let rest = p.rest.as_ref().map(ast::Identifier::as_str);
                self.node("MatchMapping", rest, |d| {
                    for (key, value) in p.keys.iter().zip(&p.patterns) {
                        d.node("Item", None, |d| {
                            d.expr(key);
                            d.pattern(value);
                        });
                    }
                });
            }
            Pattern::MatchClass(p) => self.node("MatchClass", None, |d| {
                d.expr(&p.cls);
                for sub in &p.arguments.patterns {
                    d.pattern(sub);
                }
                for keyword in &p.arguments.keywords {
                    d.node("Keyword", Some(keyword.attr.as_str()), |d| {
                        d.pattern(&keyword.pattern);
                    });
                }
            }),
            Pattern::MatchStar(p) => {
                self.leaf("MatchStar", p.name.as_ref().map(ast::Identifier::as_str));
            }
            Pattern::MatchAs(p) => {
                let name = p.name.as_ref().map(ast::Identifier::as_str);
                self.node("MatchAs", name, |d| {
                    if let Some(sub) = &p.pattern {
                        d.pattern(sub);
                    }
                });
            }
            Pattern::MatchOr(p) => self.node("MatchOr", None, |d| {
                for sub in &p.patterns {
                    d.pattern(sub);
                }
            }),
        }
    }
}

fn operator_symbol(op: ast::Operator) -> &'static str {
    match op {
        ast::Operator::Add => "+",
        ast::Operator::Sub => "-",
        ast::Operator::Mult => "*",
        ast::Operator::MatMult => "@",
        ast::Operator::Div => "/",
        ast::Operator::Mod => "%",
        ast::Operator::Pow => "**",
        ast::Operator::LShift => "<<",
        ast::Operator::RShift => ">>",
        ast::Operator::BitOr => "|",
        ast::Operator::BitXor => "^",
        ast::Operator::BitAnd => "&",
        ast::Operator::FloorDiv => "//",
    }
}

fn cmp_symbol(op: ast::CmpOp) -> &'static str {
    match op {
        ast::CmpOp::Eq => "==",
        ast::CmpOp::NotEq => "!=",
        ast::CmpOp::Lt => "<",
        ast::CmpOp::LtE => "<=",
        ast::CmpOp::Gt => ">",
        ast::CmpOp::GtE => ">=",
        ast::CmpOp::Is => "is",
        ast::CmpOp::IsNot => "is not",
        ast::CmpOp::In => "in",
        ast::CmpOp::NotIn => "not in",
    }
}

/// Load context is implied; store and delete targets are tagged.
fn context_suffix(ctx: ast::ExprContext) -> Option<&'static str> {
    match ctx {
        ast::ExprContext::Store => Some("@store"),
        ast::ExprContext::Del => Some("@del"),
        _ => None,
    }
}

fn with_context(name: &str, ctx: ast::ExprContext) -> String {
    match context_suffix(ctx) {
        Some(suffix) => format!("{name}{suffix}"),
        None => name.to_owned(),
    }
}

/// Quotes a literal so delimiters inside it cannot be confused with structure.
fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for ch in text.chars() {
        match ch {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c if c.is_control() => quoted.push_str(&format!("\\u{{{:x}}}", u32::from(c))),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::parser::AstParser;

    fn dump(source: &str) -> String {
        let module = AstParser::parse(source).unwrap();
        dump_module(&module, source)
    }

    #[test]
    fn test_assignment_dump() {
        assert_eq!(
            dump("x = 1"),
            "Module(Assign(Targets(Name:x@store),Num:1))"
        );
    }

    #[test]
    fn test_call_dump() {
        assert_eq!(dump("print(1)"), "Module(Expr(Call(Name:print,Num:1)))");
    }

    #[test]
    fn test_empty_module() {
        assert_eq!(dump(""), "Module");
        assert_eq!(dump("# only a comment\n"), "Module");
    }

    #[test]
    fn test_operators_are_labels() {
        assert_eq!(
            dump("a + b"),
            "Module(Expr(BinOp:+(Name:a,Name:b)))"
        );
        assert_eq!(
            dump("a is not b"),
            "Module(Expr(Compare:is not(Name:a,Name:b)))"
        );
        assert_eq!(dump("x += 2"), "Module(AugAssign:+=(Name:x@store,Num:2))");
    }

    #[test]
    fn test_absent_children_are_marked() {
        assert_eq!(
            dump("a[:2]"),
            "Module(Expr(Subscript(Name:a,Slice(_,Num:2,_))))"
        );
    }

    #[test]
    fn test_string_literal_is_quoted() {
        assert_eq!(
            dump("s = 'a,(b)\"'"),
            "Module(Assign(Targets(Name:s@store),Str:\"a,(b)\\\"\"))"
        );
    }

    #[test]
    fn test_implicit_concatenation_is_joined() {
        assert_eq!(dump("'ab'"), dump("'a' 'b'"));
    }

    #[test]
    fn test_function_groups() {
        let source = "@cache\ndef f(a, b=2, *args, c, **kw) -> int:\n    return a\n";
        assert_eq!(
            dump(source),
            "Module(FunctionDef:f(Decorators(Name:cache),\
             Params(Arg:a,Arg:b(Default(Num:2)),VarArg:args,KwOnly:c,KwArg:kw),\
             Returns(Name:int),Body(Return(Name:a))))"
        );
    }

    #[test]
    fn test_if_elif_else() {
        let source = "if a:\n    pass\nelif b:\n    pass\nelse:\n    pass\n";
        assert_eq!(
            dump(source),
            "Module(If(Name:a,Body(Pass),Elif(Name:b,Pass),Else(Pass)))"
        );
    }

    #[test]
    fn test_float_and_complex_literals() {
        assert_eq!(dump("1.5"), "Module(Expr(Num:1.5))");
        assert_eq!(dump("2j"), "Module(Expr(Num:0.0+2.0j))");
    }

    #[test]
    fn test_fstring_elements() {
        assert_eq!(
            dump("f'v={v!r:>4}'"),
            "Module(Expr(JoinedStr(Str:\"v=\",FormattedValue:!r(Name:v,FormatSpec(Str:\">4\")))))"
        );
    }

    #[test]
    fn test_fstring_concatenation_is_joined() {
        assert_eq!(dump("f'a' f'b{y}'"), dump("f'ab{y}'"));
        assert_eq!(dump("f'{x}' 'b' 'c'"), dump("f'{x}bc'"));
        assert_eq!(
            dump("f'{x}' 'b' 'c'"),
            "Module(Expr(JoinedStr(FormattedValue(Name:x),Str:\"bc\")))"
        );
    }

    #[test]
    fn test_template_string_ignores_quotes_and_spacing() {
        let expected = "Module(Expr(TemplateStr(Str:\"hi \",FormattedValue(Name:name))))";
        assert_eq!(dump("t'hi {name}'"), expected);
        assert_eq!(dump("t\"hi {name}\""), expected);
        assert_eq!(dump("t'hi { name }'"), expected);
        assert_eq!(dump("t'hi ' t'{name}'"), expected);
    }

    #[test]
    fn test_empty_class_parentheses() {
        assert_eq!(dump("class A():\n    pass\n"), "Module(ClassDef:A(Body(Pass)))");
        assert_eq!(dump("class A:\n    pass\n"), "Module(ClassDef:A(Body(Pass)))");
    }

    #[test]
    fn test_quote_escapes_control_chars() {
        assert_eq!(quote("a\u{1}b"), "\"a\\u{1}b\"");
        assert_eq!(quote("tab\there"), "\"tab\\there\"");
    }
}
