//! The fetch-decode-execute loop and per-opcode semantics.

use std::cmp::Ordering;
use std::io::Write;

use ippcode_common::{hexfloat, Instruction, Mode, Opcode, Operand, Value, VarRef};

use crate::error::RuntimeError;
use crate::machine::Vm;

impl<'a> Vm<'a> {
    /// Run the program to completion and return the process exit code.
    ///
    /// Terminates when the instruction pointer runs past the end of the
    /// program (code 0) or an EXIT instruction executes (its operand).
    /// Any error is fatal and reported to the caller.
    pub fn execute(&mut self) -> Result<i32, RuntimeError> {
        let program = self.program;
        loop {
            let Some(instr) = program.fetch(self.pc) else {
                return Ok(0);
            };

            match instr.opcode {
                // Control transfers set the instruction pointer
                // themselves and skip the increment below.
                Opcode::Call => {
                    let target = self.resolve_label(self.label_operand(instr, 0)?)?;
                    self.calls.push(self.pc + 1);
                    self.pc = target;
                    continue;
                }
                Opcode::Return => {
                    self.pc = self.pop_return()?;
                    continue;
                }
                Opcode::Jump => {
                    self.pc = self.resolve_label(self.label_operand(instr, 0)?)?;
                    continue;
                }
                Opcode::JumpIfEq(mode) => {
                    if let Some(target) = self.conditional_target(instr, mode, false)? {
                        self.pc = target;
                        continue;
                    }
                }
                Opcode::JumpIfNeq(mode) => {
                    if let Some(target) = self.conditional_target(instr, mode, true)? {
                        self.pc = target;
                        continue;
                    }
                }
                Opcode::Exit => return self.exec_exit(instr),

                // Label definitions already took effect at load time.
                Opcode::Label => {}

                Opcode::Move => {
                    let value = self.symb(instr, 1)?;
                    self.write_var(instr, 0, value)?;
                }
                Opcode::CreateFrame => self.frames.create_temporary(),
                Opcode::PushFrame => {
                    self.frames
                        .push_temporary()
                        .map_err(|e| self.frame_error(e))?;
                }
                Opcode::PopFrame => {
                    self.frames.pop_local().map_err(|e| self.frame_error(e))?;
                }
                Opcode::DefVar => {
                    let var = self.var_operand(instr, 0)?;
                    self.frames.declare(var).map_err(|e| self.frame_error(e))?;
                }

                Opcode::Pushs => {
                    let value = self.symb(instr, 0)?;
                    self.data.push(value);
                }
                Opcode::Pops => {
                    let value = self.pop_data()?;
                    self.write_var(instr, 0, value)?;
                }
                Opcode::Clears => self.data.clear(),

                Opcode::Add(mode) => {
                    self.exec_arith(instr, mode, i64::wrapping_add, |x, y| x + y)?
                }
                Opcode::Sub(mode) => {
                    self.exec_arith(instr, mode, i64::wrapping_sub, |x, y| x - y)?
                }
                Opcode::Mul(mode) => {
                    self.exec_arith(instr, mode, i64::wrapping_mul, |x, y| x * y)?
                }
                Opcode::IDiv(mode) => self.exec_idiv(instr, mode)?,
                Opcode::Div(mode) => self.exec_div(instr, mode)?,

                Opcode::Lt(mode) => self.exec_compare(instr, mode, Ordering::Less)?,
                Opcode::Gt(mode) => self.exec_compare(instr, mode, Ordering::Greater)?,
                Opcode::Eq(mode) => {
                    let (a, b) = self.binary_operands(instr, mode)?;
                    let result = Value::Bool(self.values_equal(&a, &b)?);
                    self.store_result(instr, mode, result)?;
                }

                Opcode::And(mode) => self.exec_logic(instr, mode, |x, y| x && y)?,
                Opcode::Or(mode) => self.exec_logic(instr, mode, |x, y| x || y)?,
                Opcode::Not(mode) => {
                    let value = self.unary_operand(instr, mode)?;
                    let Value::Bool(x) = value else {
                        return Err(self.type_error());
                    };
                    self.store_result(instr, mode, Value::Bool(!x))?;
                }

                Opcode::Int2Float(mode) => {
                    let value = self.unary_operand(instr, mode)?;
                    let Value::Int(i) = value else {
                        return Err(self.type_error());
                    };
                    self.store_result(instr, mode, Value::Float(i as f64))?;
                }
                Opcode::Float2Int(mode) => {
                    let value = self.unary_operand(instr, mode)?;
                    let Value::Float(f) = value else {
                        return Err(self.type_error());
                    };
                    // Truncation toward zero, saturating at the i64 range.
                    self.store_result(instr, mode, Value::Int(f as i64))?;
                }
                Opcode::Int2Char(mode) => self.exec_int2char(instr, mode)?,
                Opcode::Stri2Int(mode) => self.exec_stri2int(instr, mode)?,

                Opcode::Read => self.exec_read(instr)?,
                Opcode::Write => {
                    let value = self.symb(instr, 0)?;
                    let _ = write!(self.output, "{}", value.write_text());
                }

                Opcode::Concat => self.exec_concat(instr)?,
                Opcode::Strlen => self.exec_strlen(instr)?,
                Opcode::Getchar => self.exec_getchar(instr)?,
                Opcode::Setchar => self.exec_setchar(instr)?,

                Opcode::TypeOf => self.exec_type(instr)?,

                Opcode::Dprint => {
                    let value = self.symb(instr, 0)?;
                    let _ = writeln!(self.diag, "{value}");
                }
                Opcode::Break => {
                    let _ = writeln!(self.diag, "Instruction number: {}", self.pc);
                    let _ = writeln!(self.diag, "GF: {:?}", self.frames.global);
                    let _ = writeln!(self.diag, "LF: {:?}", self.frames.locals);
                    let _ = writeln!(self.diag, "TF: {:?}", self.frames.temporary);
                }
            }

            self.pc += 1;
        }
    }

    // ---- Operand routing ----

    fn operand<'i>(
        &self,
        instr: &'i Instruction,
        index: usize,
    ) -> Result<&'i Operand, RuntimeError> {
        // The loader guarantees arity; a miss here is treated as a type
        // error rather than a panic.
        instr
            .operand(index)
            .ok_or(RuntimeError::WrongOperandTypes { at: self.pc })
    }

    fn var_operand<'i>(
        &self,
        instr: &'i Instruction,
        index: usize,
    ) -> Result<&'i VarRef, RuntimeError> {
        match self.operand(instr, index)? {
            Operand::Var(var) => Ok(var),
            Operand::Literal(_) => Err(self.type_error()),
        }
    }

    fn label_operand<'i>(
        &self,
        instr: &'i Instruction,
        index: usize,
    ) -> Result<&'i str, RuntimeError> {
        match self.operand(instr, index)? {
            Operand::Literal(Value::Label(name)) => Ok(name),
            _ => Err(self.type_error()),
        }
    }

    /// Evaluate a symbol operand: a literal's value, or the current
    /// value of the referenced variable.
    fn symb(&self, instr: &Instruction, index: usize) -> Result<Value, RuntimeError> {
        match self.operand(instr, index)? {
            Operand::Var(var) => self
                .frames
                .read(var)
                .cloned()
                .map_err(|e| self.frame_error(e)),
            Operand::Literal(value) => Ok(value.clone()),
        }
    }

    fn write_var(
        &mut self,
        instr: &Instruction,
        index: usize,
        value: Value,
    ) -> Result<(), RuntimeError> {
        let var = match self.operand(instr, index)? {
            Operand::Var(var) => var,
            Operand::Literal(_) => return Err(self.type_error()),
        };
        self.frames
            .write(var, value)
            .map_err(|e| self.frame_error(e))
    }

    /// Source both operands of a binary computational instruction.
    /// Stack mode pops the second operand first.
    fn binary_operands(
        &mut self,
        instr: &Instruction,
        mode: Mode,
    ) -> Result<(Value, Value), RuntimeError> {
        match mode {
            Mode::Stack => {
                let b = self.pop_data()?;
                let a = self.pop_data()?;
                Ok((a, b))
            }
            Mode::Positional => Ok((self.symb(instr, 1)?, self.symb(instr, 2)?)),
        }
    }

    fn unary_operand(&mut self, instr: &Instruction, mode: Mode) -> Result<Value, RuntimeError> {
        match mode {
            Mode::Stack => self.pop_data(),
            Mode::Positional => self.symb(instr, 1),
        }
    }

    /// Route a result: push it in stack mode, assign the destination
    /// variable in positional mode.
    fn store_result(
        &mut self,
        instr: &Instruction,
        mode: Mode,
        value: Value,
    ) -> Result<(), RuntimeError> {
        match mode {
            Mode::Stack => {
                self.data.push(value);
                Ok(())
            }
            Mode::Positional => self.write_var(instr, 0, value),
        }
    }

    fn type_error(&self) -> RuntimeError {
        RuntimeError::WrongOperandTypes { at: self.pc }
    }

    // ---- Arithmetic ----

    fn exec_arith(
        &mut self,
        instr: &Instruction,
        mode: Mode,
        int_op: fn(i64, i64) -> i64,
        float_op: fn(f64, f64) -> f64,
    ) -> Result<(), RuntimeError> {
        let (a, b) = self.binary_operands(instr, mode)?;
        let result = match (a, b) {
            (Value::Int(x), Value::Int(y)) => Value::Int(int_op(x, y)),
            (Value::Float(x), Value::Float(y)) => Value::Float(float_op(x, y)),
            _ => return Err(self.type_error()),
        };
        self.store_result(instr, mode, result)
    }

    fn exec_idiv(&mut self, instr: &Instruction, mode: Mode) -> Result<(), RuntimeError> {
        let (a, b) = self.binary_operands(instr, mode)?;
        let result = match (a, b) {
            (Value::Int(_), Value::Int(0)) => {
                return Err(RuntimeError::WrongOperandValue { at: self.pc })
            }
            (Value::Int(x), Value::Int(y)) => Value::Int(floor_div(x, y)),
            _ => return Err(self.type_error()),
        };
        self.store_result(instr, mode, result)
    }

    fn exec_div(&mut self, instr: &Instruction, mode: Mode) -> Result<(), RuntimeError> {
        let (a, b) = self.binary_operands(instr, mode)?;
        let result = match (a, b) {
            // IEEE semantics: a zero divisor yields ±inf or NaN.
            (Value::Float(x), Value::Float(y)) => Value::Float(x / y),
            _ => return Err(self.type_error()),
        };
        self.store_result(instr, mode, result)
    }

    // ---- Relational, equality, logical ----

    fn exec_compare(
        &mut self,
        instr: &Instruction,
        mode: Mode,
        want: Ordering,
    ) -> Result<(), RuntimeError> {
        let (a, b) = self.binary_operands(instr, mode)?;
        let ord = match (&a, &b) {
            (Value::Int(x), Value::Int(y)) => Some(x.cmp(y)),
            // NaN never compares; the result is simply false.
            (Value::Float(x), Value::Float(y)) => x.partial_cmp(y),
            (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
            (Value::Str(x), Value::Str(y)) => Some(x.cmp(y)),
            _ => return Err(self.type_error()),
        };
        self.store_result(instr, mode, Value::Bool(ord == Some(want)))
    }

    /// Nil-aware equality shared by EQ and the conditional jumps: if
    /// either side is nil only the tags are compared; otherwise the
    /// tags must match and both must be orderable value types.
    fn values_equal(&self, a: &Value, b: &Value) -> Result<bool, RuntimeError> {
        match (a, b) {
            (Value::Nil, other) | (other, Value::Nil) => Ok(matches!(other, Value::Nil)),
            (Value::Int(x), Value::Int(y)) => Ok(x == y),
            (Value::Float(x), Value::Float(y)) => Ok(x == y),
            (Value::Bool(x), Value::Bool(y)) => Ok(x == y),
            (Value::Str(x), Value::Str(y)) => Ok(x == y),
            _ => Err(self.type_error()),
        }
    }

    fn exec_logic(
        &mut self,
        instr: &Instruction,
        mode: Mode,
        op: fn(bool, bool) -> bool,
    ) -> Result<(), RuntimeError> {
        let (a, b) = self.binary_operands(instr, mode)?;
        let result = match (a, b) {
            (Value::Bool(x), Value::Bool(y)) => Value::Bool(op(x, y)),
            _ => return Err(self.type_error()),
        };
        self.store_result(instr, mode, result)
    }

    // ---- Conversions ----

    fn exec_int2char(&mut self, instr: &Instruction, mode: Mode) -> Result<(), RuntimeError> {
        let value = self.unary_operand(instr, mode)?;
        let Value::Int(code) = value else {
            return Err(self.type_error());
        };
        let c = u32::try_from(code)
            .ok()
            .and_then(char::from_u32)
            .ok_or(RuntimeError::StringOperation { at: self.pc })?;
        self.store_result(instr, mode, Value::Str(c.to_string()))
    }

    fn exec_stri2int(&mut self, instr: &Instruction, mode: Mode) -> Result<(), RuntimeError> {
        let (a, b) = self.binary_operands(instr, mode)?;
        let (Value::Str(s), Value::Int(index)) = (a, b) else {
            return Err(self.type_error());
        };
        let c = char_at(&s, index).ok_or(RuntimeError::StringOperation { at: self.pc })?;
        self.store_result(instr, mode, Value::Int(c as i64))
    }

    // ---- String operations (positional only) ----

    fn exec_concat(&mut self, instr: &Instruction) -> Result<(), RuntimeError> {
        let (a, b) = (self.symb(instr, 1)?, self.symb(instr, 2)?);
        let (Value::Str(mut x), Value::Str(y)) = (a, b) else {
            return Err(self.type_error());
        };
        x.push_str(&y);
        self.write_var(instr, 0, Value::Str(x))
    }

    fn exec_strlen(&mut self, instr: &Instruction) -> Result<(), RuntimeError> {
        let Value::Str(s) = self.symb(instr, 1)? else {
            return Err(self.type_error());
        };
        // Length in code points, not bytes.
        self.write_var(instr, 0, Value::Int(s.chars().count() as i64))
    }

    fn exec_getchar(&mut self, instr: &Instruction) -> Result<(), RuntimeError> {
        let (a, b) = (self.symb(instr, 1)?, self.symb(instr, 2)?);
        let (Value::Str(s), Value::Int(index)) = (a, b) else {
            return Err(self.type_error());
        };
        let c = char_at(&s, index).ok_or(RuntimeError::StringOperation { at: self.pc })?;
        self.write_var(instr, 0, Value::Str(c.to_string()))
    }

    fn exec_setchar(&mut self, instr: &Instruction) -> Result<(), RuntimeError> {
        let target = self.symb(instr, 0)?;
        let (a, b) = (self.symb(instr, 1)?, self.symb(instr, 2)?);
        let (Value::Str(s), Value::Int(index), Value::Str(replacement)) = (target, a, b) else {
            return Err(self.type_error());
        };
        let index = usize::try_from(index)
            .ok()
            .filter(|&i| i < s.chars().count())
            .ok_or(RuntimeError::StringOperation { at: self.pc })?;
        let replacement = replacement
            .chars()
            .next()
            .ok_or(RuntimeError::StringOperation { at: self.pc })?;
        let result: String = s
            .chars()
            .enumerate()
            .map(|(i, c)| if i == index { replacement } else { c })
            .collect();
        self.write_var(instr, 0, Value::Str(result))
    }

    // ---- Introspection, I/O, termination ----

    fn exec_type(&mut self, instr: &Instruction) -> Result<(), RuntimeError> {
        let name = match self.operand(instr, 1)? {
            // Deliberately lenient: any lookup failure — missing frame,
            // unknown name, or an uninitialized slot — reads as "no
            // type yet" and yields the empty string.
            Operand::Var(var) => match self.frames.slot(var) {
                Ok(Some(value)) => value.type_name(),
                _ => "",
            },
            Operand::Literal(value) => value.type_name(),
        };
        self.write_var(instr, 0, Value::Str(name.to_string()))
    }

    fn exec_read(&mut self, instr: &Instruction) -> Result<(), RuntimeError> {
        let Value::Type(requested) = self.symb(instr, 1)? else {
            return Err(self.type_error());
        };
        if !matches!(requested.as_str(), "int" | "float" | "bool" | "string") {
            return Err(self.type_error());
        }
        let value = self.read_line_as(&requested);
        self.write_var(instr, 0, value)
    }

    /// Read one line and coerce it. Stream exhaustion and coercion
    /// failure both produce nil, never an error.
    fn read_line_as(&mut self, requested: &str) -> Value {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => return Value::Nil,
            Ok(_) => {}
        }
        let line = line.strip_suffix('\n').unwrap_or(&line);
        match requested {
            "int" => line
                .trim()
                .parse::<i64>()
                .map(Value::Int)
                .unwrap_or(Value::Nil),
            "float" => hexfloat::parse(line)
                .map(Value::Float)
                .unwrap_or(Value::Nil),
            "bool" => Value::Bool(line.trim().eq_ignore_ascii_case("true")),
            _ => Value::Str(line.to_string()),
        }
    }

    fn exec_exit(&mut self, instr: &Instruction) -> Result<i32, RuntimeError> {
        match self.symb(instr, 0)? {
            Value::Int(code) if (0..=49).contains(&code) => Ok(code as i32),
            Value::Int(_) => Err(RuntimeError::WrongOperandValue { at: self.pc }),
            _ => Err(self.type_error()),
        }
    }

    /// Conditional jump: resolve the label before evaluating the
    /// condition, so an unknown label always fails regardless of the
    /// comparison's outcome.
    fn conditional_target(
        &mut self,
        instr: &Instruction,
        mode: Mode,
        negate: bool,
    ) -> Result<Option<usize>, RuntimeError> {
        let target = self.resolve_label(self.label_operand(instr, 0)?)?;
        let (a, b) = self.binary_operands(instr, mode)?;
        let taken = self.values_equal(&a, &b)? != negate;
        Ok(taken.then_some(target))
    }
}

/// Code point at a signed position, `None` when out of range.
fn char_at(s: &str, index: i64) -> Option<char> {
    let index = usize::try_from(index).ok()?;
    s.chars().nth(index)
}

/// Integer division rounding toward negative infinity.
fn floor_div(a: i64, b: i64) -> i64 {
    let q = a.wrapping_div(b);
    let r = a.wrapping_rem(b);
    if r != 0 && (r < 0) != (b < 0) {
        q - 1
    } else {
        q
    }
}

#[cfg(test)]
mod tests {
    use super::floor_div;

    #[test]
    fn floor_division_rounds_down() {
        assert_eq!(floor_div(7, 2), 3);
        assert_eq!(floor_div(-7, 2), -4);
        assert_eq!(floor_div(7, -2), -4);
        assert_eq!(floor_div(-7, -2), 3);
        assert_eq!(floor_div(6, 3), 2);
        assert_eq!(floor_div(-6, 3), -2);
    }

    #[test]
    fn floor_division_min_by_minus_one_wraps() {
        assert_eq!(floor_div(i64::MIN, -1), i64::MIN);
    }
}
