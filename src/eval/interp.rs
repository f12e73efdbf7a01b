//! Tree-walking interpreter, the default [`Evaluator`].

use tracing::info;

use crate::core::Value;

use super::lexer::Lexer;
use super::parser::{BinaryOp, Expr, NameRef, Parser, Stmt, UnaryOp};
use super::{EvalError, Evaluator, Table};

/// Default expression engine.
///
/// Holds the persistent global table. `print(...)` output is logged under
/// the `rummy::print` target and kept until [`Interpreter::take_output`].
///
/// ```
/// use rummy::eval::{Evaluator, Interpreter};
/// use rummy::core::Value;
///
/// let mut vm = Interpreter::new();
/// vm.interpret("a = 2", None).unwrap();
/// let assigned = vm.interpret("b[0] = a * 21", None).unwrap();
///
/// assert_eq!(assigned.as_deref(), Some("b[0]"));
/// assert_eq!(vm.globals().get("b[0]"), Some(&Value::Number(42.0)));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Interpreter {
    globals: Table,
    output: Vec<String>,
}

impl Interpreter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain the lines written by `print`.
    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }

    fn eval(&mut self, expr: &Expr, locals: Option<&Table>) -> Result<Value, EvalError> {
        match expr {
            Expr::Number(n) => Ok(Value::Number(*n)),
            Expr::Str(s) => Ok(Value::Str(s.clone())),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Name(name) => {
                let key = self.resolve_key(name, locals)?;
                locals
                    .and_then(|table| table.get(&key))
                    .or_else(|| self.globals.get(&key))
                    .cloned()
                    .ok_or(EvalError::UndefinedName(key))
            }
            Expr::Unary(op, operand) => {
                let value = self.eval(operand, locals)?;
                unary(*op, value)
            }
            Expr::Binary(BinaryOp::And, lhs, rhs) => {
                if !expect_bool("&&", self.eval(lhs, locals)?)? {
                    return Ok(Value::Bool(false));
                }
                Ok(Value::Bool(expect_bool("&&", self.eval(rhs, locals)?)?))
            }
            Expr::Binary(BinaryOp::Or, lhs, rhs) => {
                if expect_bool("||", self.eval(lhs, locals)?)? {
                    return Ok(Value::Bool(true));
                }
                Ok(Value::Bool(expect_bool("||", self.eval(rhs, locals)?)?))
            }
            Expr::Binary(op, lhs, rhs) => {
                let lhs = self.eval(lhs, locals)?;
                let rhs = self.eval(rhs, locals)?;
                binary(*op, lhs, rhs)
            }
            Expr::Call(func, args) => {
                let values = args
                    .iter()
                    .map(|arg| self.eval(arg, locals))
                    .collect::<Result<Vec<_>, _>>()?;
                self.call(func, values)
            }
        }
    }

    /// Normalized table key of a name: `path` or `path[N]`.
    fn resolve_key(&mut self, name: &NameRef, locals: Option<&Table>) -> Result<String, EvalError> {
        let Some(index) = &name.index else {
            return Ok(name.path.clone());
        };
        let n = match self.eval(index, locals)? {
            Value::Number(n) => n,
            other => {
                return Err(EvalError::TypeMismatch {
                    op: "[]",
                    expected: "a number",
                    found: other.kind(),
                })
            }
        };
        if !n.is_finite() || n < 0.0 || n.fract() != 0.0 {
            return Err(EvalError::InvalidIndex(n));
        }
        Ok(format!("{}[{}]", name.path, n as u64))
    }

    fn call(&mut self, func: &str, args: Vec<Value>) -> Result<Value, EvalError> {
        match func {
            "print" => {
                let line = args
                    .iter()
                    .map(|v| v.to_deck_string(None))
                    .collect::<Vec<_>>()
                    .join(" ");
                info!(target: "rummy::print", "{}", line);
                self.output.push(line.clone());
                Ok(Value::Str(line))
            }
            "sqrt" | "abs" | "exp" | "log" | "log10" | "sin" | "cos" | "tan" | "floor" | "ceil" => {
                let [x] = numbers::<1>(func, &args)?;
                let result = match func {
                    "sqrt" => x.sqrt(),
                    "abs" => x.abs(),
                    "exp" => x.exp(),
                    "log" => x.ln(),
                    "log10" => x.log10(),
                    "sin" => x.sin(),
                    "cos" => x.cos(),
                    "tan" => x.tan(),
                    "floor" => x.floor(),
                    _ => x.ceil(),
                };
                Ok(Value::Number(result))
            }
            "pow" => {
                let [base, exponent] = numbers::<2>(func, &args)?;
                Ok(Value::Number(base.powf(exponent)))
            }
            "min" | "max" => {
                if args.is_empty() {
                    return Err(EvalError::Arity {
                        name: func.to_string(),
                        expected: "at least 1",
                        found: 0,
                    });
                }
                let op: &'static str = if func == "min" { "min" } else { "max" };
                let mut best = expect_number(op, &args[0])?;
                for arg in &args[1..] {
                    let x = expect_number(op, arg)?;
                    best = if func == "min" { best.min(x) } else { best.max(x) };
                }
                Ok(Value::Number(best))
            }
            _ => Err(EvalError::UnknownFunction(func.to_string())),
        }
    }
}

impl Evaluator for Interpreter {
    fn interpret(&mut self, statement: &str, locals: Option<&Table>) -> Result<Option<String>, EvalError> {
        let tokens = Lexer::new(statement).tokenize()?;
        match Parser::new(&tokens).parse_statement()? {
            Stmt::Assign(target, expr) => {
                let value = self.eval(&expr, locals)?;
                let key = self.resolve_key(&target, locals)?;
                self.globals.insert(key.clone(), value);
                Ok(Some(key))
            }
            Stmt::Expr(expr) => {
                self.eval(&expr, locals)?;
                Ok(None)
            }
        }
    }

    fn globals(&self) -> &Table {
        &self.globals
    }

    fn globals_mut(&mut self) -> &mut Table {
        &mut self.globals
    }
}

fn numbers<const N: usize>(func: &str, args: &[Value]) -> Result<[f64; N], EvalError> {
    if args.len() != N {
        return Err(EvalError::Arity {
            name: func.to_string(),
            expected: if N == 1 { "1" } else { "2" },
            found: args.len(),
        });
    }
    let mut out = [0.0; N];
    for (slot, arg) in out.iter_mut().zip(args) {
        *slot = match arg {
            Value::Number(n) => *n,
            other => {
                return Err(EvalError::TypeMismatch {
                    op: "function argument",
                    expected: "a number",
                    found: other.kind(),
                })
            }
        };
    }
    Ok(out)
}

fn expect_number(op: &'static str, value: &Value) -> Result<f64, EvalError> {
    value.as_number().ok_or(EvalError::TypeMismatch {
        op,
        expected: "a number",
        found: value.kind(),
    })
}

fn expect_bool(op: &'static str, value: Value) -> Result<bool, EvalError> {
    value.as_bool().ok_or(EvalError::TypeMismatch {
        op,
        expected: "a boolean",
        found: value.kind(),
    })
}

fn unary(op: UnaryOp, value: Value) -> Result<Value, EvalError> {
    match op {
        UnaryOp::Neg => Ok(Value::Number(-expect_number("-", &value)?)),
        UnaryOp::Plus => Ok(Value::Number(expect_number("+", &value)?)),
        UnaryOp::Not => Ok(Value::Bool(!expect_bool("!", value)?)),
    }
}

fn binary(op: BinaryOp, lhs: Value, rhs: Value) -> Result<Value, EvalError> {
    use Value::{Number, Str};
    match (op, lhs, rhs) {
        (BinaryOp::Eq, a, b) => Ok(Value::Bool(a == b)),
        (BinaryOp::Ne, a, b) => Ok(Value::Bool(a != b)),
        (BinaryOp::Add, Str(a), Str(b)) => Ok(Str(a + &b)),
        (BinaryOp::Add, Number(a), Number(b)) => Ok(Number(a + b)),
        (BinaryOp::Sub, Number(a), Number(b)) => Ok(Number(a - b)),
        (BinaryOp::Mul, Number(a), Number(b)) => Ok(Number(a * b)),
        (BinaryOp::Div, Number(a), Number(b)) => Ok(Number(a / b)),
        (BinaryOp::Rem, Number(a), Number(b)) => Ok(Number(a % b)),
        (BinaryOp::Pow, Number(a), Number(b)) => Ok(Number(a.powf(b))),
        (BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge, Number(a), Number(b)) => {
            Ok(Value::Bool(a.partial_cmp(&b).is_some_and(|ord| compare(op, ord))))
        }
        (BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge, Str(a), Str(b)) => {
            Ok(Value::Bool(compare(op, a.cmp(&b))))
        }
        (op, Number(_), other) | (op, other, _) => Err(EvalError::TypeMismatch {
            op: op.symbol(),
            expected: "operands of matching kind",
            found: other.kind(),
        }),
    }
}

fn compare(op: BinaryOp, ordering: std::cmp::Ordering) -> bool {
    use std::cmp::Ordering::*;
    match op {
        BinaryOp::Lt => ordering == Less,
        BinaryOp::Le => ordering != Greater,
        BinaryOp::Gt => ordering == Greater,
        _ => ordering != Less,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(vm: &mut Interpreter, stmt: &str) -> Option<String> {
        vm.interpret(stmt, None).unwrap()
    }

    fn global(vm: &Interpreter, key: &str) -> Value {
        vm.globals().get(key).cloned().unwrap()
    }

    #[test]
    fn test_arithmetic() {
        let mut vm = Interpreter::new();
        run(&mut vm, "a = 10");
        run(&mut vm, "b = (a + 2) * 3 - 2^3");
        assert_eq!(global(&vm, "b"), Value::Number(28.0));
        run(&mut vm, "c = -2^2");
        assert_eq!(global(&vm, "c"), Value::Number(-4.0));
        run(&mut vm, "d = 7 % 4 + 2**-1");
        assert_eq!(global(&vm, "d"), Value::Number(3.5));
    }

    #[test]
    fn test_strings_and_bools() {
        let mut vm = Interpreter::new();
        run(&mut vm, "s = \"foo\" + \"bar\"");
        assert_eq!(global(&vm, "s"), Value::from("foobar"));
        run(&mut vm, "t = 1 < 2 && !(3 == 4) || false");
        assert_eq!(global(&vm, "t"), Value::Bool(true));
        run(&mut vm, "u = \"a\" < \"b\"");
        assert_eq!(global(&vm, "u"), Value::Bool(true));
    }

    #[test]
    fn test_short_circuit_skips_undefined() {
        let mut vm = Interpreter::new();
        run(&mut vm, "x = false && missing");
        assert_eq!(global(&vm, "x"), Value::Bool(false));
    }

    #[test]
    fn test_locals_shadow_globals() {
        let mut vm = Interpreter::new();
        run(&mut vm, "card1 = 1");
        let mut locals = Table::default();
        locals.insert("card1".to_string(), Value::Number(5.0));
        vm.interpret("suit.card2 = card1 * 2", Some(&locals)).unwrap();
        assert_eq!(global(&vm, "suit.card2"), Value::Number(10.0));
    }

    #[test]
    fn test_index_normalization() {
        let mut vm = Interpreter::new();
        run(&mut vm, "i = 1");
        let key = run(&mut vm, "v[i+1] = 3");
        assert_eq!(key.as_deref(), Some("v[2]"));
        run(&mut vm, "w = v[2] + 1");
        assert_eq!(global(&vm, "w"), Value::Number(4.0));
        assert_eq!(
            vm.interpret("z = v[0.5]", None),
            Err(EvalError::InvalidIndex(0.5))
        );
    }

    #[test]
    fn test_builtins() {
        let mut vm = Interpreter::new();
        run(&mut vm, "a = sqrt(16) + max(1, 5, 3) - min(2, 9) + pow(2, 3)");
        assert_eq!(global(&vm, "a"), Value::Number(15.0));
        assert_eq!(
            vm.interpret("b = nope(1)", None),
            Err(EvalError::UnknownFunction("nope".into()))
        );
        assert!(matches!(
            vm.interpret("b = sqrt(1, 2)", None),
            Err(EvalError::Arity { found: 2, .. })
        ));
    }

    #[test]
    fn test_print_is_recorded() {
        let mut vm = Interpreter::new();
        run(&mut vm, "a = 2.5");
        assert_eq!(run(&mut vm, "print(\"a is\", a)"), None);
        assert_eq!(vm.take_output(), vec!["a is 2.5e0".to_string()]);
        assert!(vm.take_output().is_empty());
    }

    #[test]
    fn test_errors() {
        let mut vm = Interpreter::new();
        assert_eq!(
            vm.interpret("a = b", None),
            Err(EvalError::UndefinedName("b".into()))
        );
        assert!(matches!(
            vm.interpret("a = 1 + \"x\"", None),
            Err(EvalError::TypeMismatch { op: "+", .. })
        ));
        assert!(vm.globals().is_empty());
    }
}
