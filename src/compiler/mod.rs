//! Lowers a syntax tree to bytecode. Only the documented subset of the
//! language is supported here — struct/enum/contract/event/impl/method
//! calls/closures/lambdas stay tree-walk-only; this compiler returns a
//! `Diagnostic` rather than silently mishandling them.
pub mod scope;

use std::rc::Rc;

use crate::ast::expression::LogicalOp;
use crate::ast::{Expression, Program, Statement};
use crate::bytecode::OpCode;
use crate::diagnostic::Diagnostic;
use crate::value::{Callable, CompiledFunction, Value};
use scope::LocalScope;

pub struct Compiler {
    code: Vec<OpCode>,
    constants: Vec<Value>,
    locals: LocalScope,
    break_patches: Vec<Vec<usize>>,
    continue_patches: Vec<Vec<usize>>,
}

fn unsupported(what: &str) -> Diagnostic {
    Diagnostic::runtime(format!("bytecode backend does not support {what}"))
}

impl Compiler {
    pub fn new() -> Self {
        Self {
            code: Vec::new(),
            constants: Vec::new(),
            locals: LocalScope::new(),
            break_patches: Vec::new(),
            continue_patches: Vec::new(),
        }
    }

    fn emit(&mut self, op: OpCode) -> usize {
        self.code.push(op);
        self.code.len() - 1
    }

    fn patch_jump(&mut self, index: usize, target: usize) {
        self.code[index] = match &self.code[index] {
            OpCode::Jump(_) => OpCode::Jump(target),
            OpCode::JumpIfFalse(_) => OpCode::JumpIfFalse(target),
            OpCode::JumpIfTrue(_) => OpCode::JumpIfTrue(target),
            other => other.clone(),
        };
    }

    fn add_constant(&mut self, value: Value) -> usize {
        self.constants.push(value);
        self.constants.len() - 1
    }

    pub fn compile(mut self, program: &Program) -> Result<(Vec<OpCode>, Vec<Value>), Diagnostic> {
        self.compile_block(&program.statements)?;
        self.emit(OpCode::Halt);
        Ok((self.code, self.constants))
    }

    fn compile_block(&mut self, block: &[Statement]) -> Result<(), Diagnostic> {
        for statement in block {
            self.compile_statement(statement)?;
        }
        Ok(())
    }

    fn compile_statement(&mut self, statement: &Statement) -> Result<(), Diagnostic> {
        match statement {
            Statement::Expression(expr) => {
                self.compile_expression(expr)?;
                self.emit(OpCode::Pop);
            }
            Statement::VarDecl { name, value, .. } => {
                match value {
                    Some(expr) => self.compile_expression(expr)?,
                    None => {
                        self.emit(OpCode::Push(Value::None));
                    }
                };
                let slot = self.locals.slot_for(name);
                self.emit(OpCode::Define(name.clone(), slot));
            }
            Statement::Assignment {
                target, op, value, ..
            } => self.compile_assignment(target, op, value)?,
            Statement::If {
                then_branch,
                elif_branches,
                else_branch,
            } => {
                let mut end_jumps = Vec::new();
                self.compile_expression(&then_branch.condition)?;
                let false_jump = self.emit(OpCode::JumpIfFalse(0));
                self.compile_block(&then_branch.body)?;
                end_jumps.push(self.emit(OpCode::Jump(0)));
                self.patch_jump(false_jump, self.code.len());

                for branch in elif_branches {
                    self.compile_expression(&branch.condition)?;
                    let false_jump = self.emit(OpCode::JumpIfFalse(0));
                    self.compile_block(&branch.body)?;
                    end_jumps.push(self.emit(OpCode::Jump(0)));
                    self.patch_jump(false_jump, self.code.len());
                }

                if let Some(body) = else_branch {
                    self.compile_block(body)?;
                }
                let end = self.code.len();
                for jump in end_jumps {
                    self.patch_jump(jump, end);
                }
            }
            Statement::While { condition, body } => {
                let loop_start = self.code.len();
                self.compile_expression(condition)?;
                let exit_jump = self.emit(OpCode::JumpIfFalse(0));
                self.break_patches.push(Vec::new());
                self.continue_patches.push(Vec::new());
                self.compile_block(body)?;

                let continues = self.continue_patches.pop().unwrap();
                for c in continues {
                    self.patch_jump(c, loop_start);
                }
                self.emit(OpCode::Jump(loop_start));
                self.patch_jump(exit_jump, self.code.len());
                let breaks = self.break_patches.pop().unwrap();
                for b in breaks {
                    self.patch_jump(b, self.code.len());
                }
            }
            Statement::ForIn {
                var,
                iterable,
                body,
                ..
            } => self.compile_for_in(var, iterable, body)?,
            Statement::Break(_) => {
                let patches = self
                    .break_patches
                    .last_mut()
                    .ok_or_else(|| unsupported("'break' outside a loop"))?;
                let index = self.emit(OpCode::Jump(0));
                patches.push(index);
            }
            Statement::Continue(_) => {
                let patches = self
                    .continue_patches
                    .last_mut()
                    .ok_or_else(|| unsupported("'continue' outside a loop"))?;
                let index = self.emit(OpCode::Jump(0));
                patches.push(index);
            }
            Statement::Return(value, _) => {
                match value {
                    Some(expr) => self.compile_expression(expr)?,
                    None => {
                        self.emit(OpCode::Push(Value::None));
                    }
                };
                self.emit(OpCode::Return);
            }
            Statement::FnDecl(decl) => {
                let mut nested = Compiler::new();
                for param in &decl.params {
                    nested.locals.slot_for(&param.name);
                }
                nested.compile_block(&decl.body)?;
                nested.emit(OpCode::Push(Value::None));
                nested.emit(OpCode::Return);
                let compiled = CompiledFunction {
                    name: decl.name.clone(),
                    params: decl.params.iter().map(|p| p.name.clone()).collect(),
                    code: nested.code,
                    num_locals: nested.locals.count(),
                };
                let idx =
                    self.add_constant(Value::Callable(Callable::Compiled(Rc::new(compiled))));
                self.emit(OpCode::LoadConst(idx));
                let slot = self.locals.slot_for(&decl.name);
                self.emit(OpCode::Define(decl.name.clone(), slot));
            }
            Statement::StructDecl { .. } => return Err(unsupported("'struct' declarations")),
            Statement::EnumDecl { .. } => return Err(unsupported("'enum' declarations")),
            Statement::ContractDecl { .. } => return Err(unsupported("'contract' declarations")),
            Statement::EventDecl { .. } => return Err(unsupported("'event' declarations")),
            Statement::Emit { .. } => return Err(unsupported("'emit' statements")),
            Statement::Impl { .. } => return Err(unsupported("'impl' blocks")),
        }
        Ok(())
    }

    fn compile_for_in(
        &mut self,
        var: &str,
        iterable: &Expression,
        body: &[Statement],
    ) -> Result<(), Diagnostic> {
        self.compile_expression(iterable)?;
        let iter_slot = self.locals.slot_for("__iter__");
        self.emit(OpCode::Define("__iter__".to_string(), iter_slot));
        self.emit(OpCode::Push(Value::Int(0)));
        let idx_slot = self.locals.slot_for("__idx__");
        self.emit(OpCode::Define("__idx__".to_string(), idx_slot));

        let loop_start = self.code.len();
        self.emit(OpCode::Load("__idx__".to_string()));
        self.emit(OpCode::Load("__iter__".to_string()));
        self.emit(OpCode::Len);
        self.emit(OpCode::Lt);
        let exit_jump = self.emit(OpCode::JumpIfFalse(0));

        self.emit(OpCode::Load("__iter__".to_string()));
        self.emit(OpCode::Load("__idx__".to_string()));
        self.emit(OpCode::Index);
        let var_slot = self.locals.slot_for(var);
        self.emit(OpCode::Define(var.to_string(), var_slot));

        self.break_patches.push(Vec::new());
        self.continue_patches.push(Vec::new());
        self.compile_block(body)?;

        let increment_start = self.code.len();
        let continues = self.continue_patches.pop().unwrap();
        for c in continues {
            self.patch_jump(c, increment_start);
        }
        self.emit(OpCode::Load("__idx__".to_string()));
        self.emit(OpCode::Push(Value::Int(1)));
        self.emit(OpCode::Add);
        self.emit(OpCode::Store("__idx__".to_string()));
        self.emit(OpCode::Jump(loop_start));

        self.patch_jump(exit_jump, self.code.len());
        let breaks = self.break_patches.pop().unwrap();
        for b in breaks {
            self.patch_jump(b, self.code.len());
        }
        Ok(())
    }

    fn compile_assignment(
        &mut self,
        target: &Expression,
        op: &str,
        value: &Expression,
    ) -> Result<(), Diagnostic> {
        match target {
            Expression::Identifier(name, _) => {
                if op == "=" {
                    self.compile_expression(value)?;
                } else {
                    self.emit(OpCode::Load(name.clone()));
                    self.compile_expression(value)?;
                    self.emit(compound_opcode(op)?);
                }
                self.emit(OpCode::Store(name.clone()));
            }
            Expression::Index { object, index, .. } => {
                self.compile_expression(object)?;
                self.compile_expression(index)?;
                if op == "=" {
                    self.compile_expression(value)?;
                } else {
                    self.emit(OpCode::Dup2);
                    self.emit(OpCode::Index);
                    self.compile_expression(value)?;
                    self.emit(compound_opcode(op)?);
                }
                self.emit(OpCode::StoreIndex);
            }
            Expression::Member { object, name, .. } => {
                self.compile_expression(object)?;
                let idx = self.add_constant(Value::str(name.clone()));
                if op == "=" {
                    self.compile_expression(value)?;
                } else {
                    self.emit(OpCode::Dup);
                    self.emit(OpCode::GetAttr(idx));
                    self.compile_expression(value)?;
                    self.emit(compound_opcode(op)?);
                }
                self.emit(OpCode::SetAttr(idx));
            }
            _ => return Err(Diagnostic::runtime("invalid assignment target")),
        }
        Ok(())
    }

    fn compile_expression(&mut self, expr: &Expression) -> Result<(), Diagnostic> {
        match expr {
            Expression::Integer(v, _) => {
                self.emit(OpCode::Push(Value::Int(*v)));
            }
            Expression::Float(v, _) => {
                self.emit(OpCode::Push(Value::Float(*v)));
            }
            Expression::Str(s, _) => {
                self.emit(OpCode::Push(Value::str(s.clone())));
            }
            Expression::Boolean(b, _) => {
                self.emit(OpCode::Push(Value::Bool(*b)));
            }
            Expression::Null(_) => {
                self.emit(OpCode::Push(Value::None));
            }
            Expression::Identifier(name, _) => {
                self.emit(OpCode::Load(name.clone()));
            }
            Expression::ListLiteral(items, _) => {
                for item in items {
                    self.compile_expression(item)?;
                }
                self.emit(OpCode::BuildList(items.len()));
            }
            Expression::MapLiteral(entries, _) => {
                for (key, value) in entries {
                    self.compile_expression(key)?;
                    self.compile_expression(value)?;
                }
                self.emit(OpCode::BuildMap(entries.len()));
            }
            Expression::Unary { op, operand, .. } => {
                self.compile_expression(operand)?;
                self.emit(match op.as_str() {
                    "-" => OpCode::Neg,
                    "~" => OpCode::BitNot,
                    "not" => OpCode::Not,
                    other => return Err(unsupported(&format!("unary operator '{other}'"))),
                });
            }
            Expression::Binary {
                left, op, right, ..
            } => {
                self.compile_expression(left)?;
                self.compile_expression(right)?;
                self.emit(compound_opcode(op)?);
            }
            Expression::Comparison {
                left, op, right, ..
            } => {
                self.compile_expression(left)?;
                self.compile_expression(right)?;
                self.emit(match op.as_str() {
                    "==" => OpCode::Eq,
                    "!=" => OpCode::NotEq,
                    "<" => OpCode::Lt,
                    ">" => OpCode::Gt,
                    "<=" => OpCode::Le,
                    ">=" => OpCode::Ge,
                    other => return Err(unsupported(&format!("comparison operator '{other}'"))),
                });
            }
            Expression::Logical {
                left, op, right, ..
            } => match op {
                LogicalOp::And => {
                    self.compile_expression(left)?;
                    self.emit(OpCode::Dup);
                    let jump = self.emit(OpCode::JumpIfFalse(0));
                    self.emit(OpCode::Pop);
                    self.compile_expression(right)?;
                    self.patch_jump(jump, self.code.len());
                }
                LogicalOp::Or => {
                    self.compile_expression(left)?;
                    self.emit(OpCode::Dup);
                    let jump = self.emit(OpCode::JumpIfTrue(0));
                    self.emit(OpCode::Pop);
                    self.compile_expression(right)?;
                    self.patch_jump(jump, self.code.len());
                }
            },
            Expression::Member { object, name, .. } => {
                self.compile_expression(object)?;
                let idx = self.add_constant(Value::str(name.clone()));
                self.emit(OpCode::GetAttr(idx));
            }
            Expression::Index { object, index, .. } => {
                self.compile_expression(object)?;
                self.compile_expression(index)?;
                self.emit(OpCode::Index);
            }
            Expression::Call { callee, args, .. } => {
                self.compile_expression(callee)?;
                for arg in args {
                    self.compile_expression(arg)?;
                }
                self.emit(OpCode::Call(args.len()));
            }
            Expression::MethodCall { .. } => return Err(unsupported("method-call expressions")),
            Expression::Lambda { .. } => return Err(unsupported("lambda expressions")),
            Expression::Await { .. } => return Err(unsupported("'await' expressions")),
        }
        Ok(())
    }
}

fn compound_opcode(op: &str) -> Result<OpCode, Diagnostic> {
    Ok(match op {
        "+" | "+=" => OpCode::Add,
        "-" | "-=" => OpCode::Sub,
        "*" | "*=" => OpCode::Mul,
        "/" | "/=" => OpCode::Div,
        "%" => OpCode::Mod,
        "**" => OpCode::Pow,
        "&" => OpCode::BitAnd,
        "|" => OpCode::BitOr,
        "^" => OpCode::BitXor,
        "<<" => OpCode::Shl,
        ">>" => OpCode::Shr,
        other => return Err(unsupported(&format!("operator '{other}'"))),
    })
}

pub fn compile(program: &Program) -> Result<(Vec<OpCode>, Vec<Value>), Diagnostic> {
    Compiler::new().compile(program)
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::parse;

    fn compile_source(src: &str) -> Vec<OpCode> {
        let program = parse(tokenize(src).unwrap()).unwrap();
        compile(&program).unwrap().0
    }

    #[test]
    fn compiles_expression_statement_with_trailing_pop() {
        let code = compile_source("1 + 2\n");
        assert!(matches!(code.last(), Some(OpCode::Halt)));
        assert!(code
            .iter()
            .any(|op| matches!(op, OpCode::Pop)));
    }

    #[test]
    fn and_or_lowering_is_stack_balanced() {
        let code = compile_source("let x = true and false\n");
        let dup_count = code.iter().filter(|op| matches!(op, OpCode::Dup)).count();
        let pop_after_dup = code.iter().filter(|op| matches!(op, OpCode::Pop)).count();
        assert_eq!(dup_count, 1);
        assert!(pop_after_dup >= 1);
    }

    #[test]
    fn for_in_uses_dedicated_len_opcode() {
        let code = compile_source("for x in [1, 2, 3] {\n}\n");
        assert!(code.iter().any(|op| matches!(op, OpCode::Len)));
    }

    #[test]
    fn struct_declaration_is_rejected() {
        let program = parse(tokenize("struct Point { x: int, y: int }\n").unwrap()).unwrap();
        assert!(compile(&program).is_err());
    }
}
