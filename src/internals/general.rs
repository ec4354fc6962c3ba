// General-purpose builtin words

use crate::internals::error::{ForthError, ForthResult};
use crate::internals::token::Flow;
use crate::kernel::{flag, FALSE, TRUE};
use crate::runtime::ForthRuntime;

/// Floored division: the quotient rounds toward negative infinity and the remainder takes the
/// sign of the divisor.
pub fn u_floor_divmod(a: i64, b: i64) -> ForthResult<(i64, i64)> {
    if b == 0 {
        return Err(ForthError::DivisionByZero);
    }
    let q = a.wrapping_div(b);
    let r = a.wrapping_rem(b);
    if r != 0 && ((r < 0) != (b < 0)) {
        Ok((q - 1, r + b))
    } else {
        Ok((q, r))
    }
}

impl ForthRuntime {
    /// Basic Forth operations on the stack.
    ///
    pub fn f_plus(&mut self) -> ForthResult<Flow> {
        self.kernel.pop2_push1(|a, b| Ok(a.wrapping_add(b)))?;
        Ok(Flow::Next)
    }

    pub fn f_minus(&mut self) -> ForthResult<Flow> {
        self.kernel.pop2_push1(|a, b| Ok(a.wrapping_sub(b)))?;
        Ok(Flow::Next)
    }

    pub fn f_times(&mut self) -> ForthResult<Flow> {
        self.kernel.pop2_push1(|a, b| Ok(a.wrapping_mul(b)))?;
        Ok(Flow::Next)
    }

    pub fn f_divide(&mut self) -> ForthResult<Flow> {
        self.kernel.pop2_push1(|a, b| Ok(u_floor_divmod(a, b)?.0))?;
        Ok(Flow::Next)
    }

    pub fn f_mod(&mut self) -> ForthResult<Flow> {
        self.kernel.pop2_push1(|a, b| Ok(u_floor_divmod(a, b)?.1))?;
        Ok(Flow::Next)
    }

    /// /MOD ( j k -- r q ) remainder goes on first, then the quotient
    pub fn f_slash_mod(&mut self) -> ForthResult<Flow> {
        self.kernel.stack_check(2)?;
        let b = self.kernel.peek(0)?;
        let a = self.kernel.peek(1)?;
        let (q, r) = u_floor_divmod(a, b)?;
        self.kernel.pop_n::<2>()?;
        self.kernel.push(r);
        self.kernel.push(q);
        Ok(Flow::Next)
    }

    pub fn f_invert(&mut self) -> ForthResult<Flow> {
        self.kernel.pop1_push1(|a| !a)?;
        Ok(Flow::Next)
    }

    pub fn f_and(&mut self) -> ForthResult<Flow> {
        self.kernel.pop2_push1(|a, b| Ok(a & b))?;
        Ok(Flow::Next)
    }

    pub fn f_or(&mut self) -> ForthResult<Flow> {
        self.kernel.pop2_push1(|a, b| Ok(a | b))?;
        Ok(Flow::Next)
    }

    pub fn f_greater(&mut self) -> ForthResult<Flow> {
        self.kernel.pop2_push1(|a, b| Ok(flag(a > b)))?;
        Ok(Flow::Next)
    }

    pub fn f_greater_equal(&mut self) -> ForthResult<Flow> {
        self.kernel.pop2_push1(|a, b| Ok(flag(a >= b)))?;
        Ok(Flow::Next)
    }

    pub fn f_less(&mut self) -> ForthResult<Flow> {
        self.kernel.pop2_push1(|a, b| Ok(flag(a < b)))?;
        Ok(Flow::Next)
    }

    pub fn f_less_equal(&mut self) -> ForthResult<Flow> {
        self.kernel.pop2_push1(|a, b| Ok(flag(a <= b)))?;
        Ok(Flow::Next)
    }

    pub fn f_equal(&mut self) -> ForthResult<Flow> {
        self.kernel.pop2_push1(|a, b| Ok(flag(a == b)))?;
        Ok(Flow::Next)
    }

    pub fn f_not_equal(&mut self) -> ForthResult<Flow> {
        self.kernel.pop2_push1(|a, b| Ok(flag(a != b)))?;
        Ok(Flow::Next)
    }

    pub fn f_0equal(&mut self) -> ForthResult<Flow> {
        self.kernel.pop1_push1(|a| flag(a == 0))?;
        Ok(Flow::Next)
    }

    pub fn f_0less(&mut self) -> ForthResult<Flow> {
        self.kernel.pop1_push1(|a| flag(a < 0))?;
        Ok(Flow::Next)
    }

    pub fn f_true(&mut self) -> ForthResult<Flow> {
        self.kernel.push(TRUE);
        Ok(Flow::Next)
    }

    pub fn f_false(&mut self) -> ForthResult<Flow> {
        self.kernel.push(FALSE);
        Ok(Flow::Next)
    }

    pub fn f_dup(&mut self) -> ForthResult<Flow> {
        let top = self.kernel.top()?;
        self.kernel.push(top);
        Ok(Flow::Next)
    }

    pub fn f_drop(&mut self) -> ForthResult<Flow> {
        self.kernel.pop()?;
        Ok(Flow::Next)
    }

    pub fn f_swap(&mut self) -> ForthResult<Flow> {
        let [a, b] = self.kernel.pop_n::<2>()?;
        self.kernel.push(b);
        self.kernel.push(a);
        Ok(Flow::Next)
    }

    pub fn f_over(&mut self) -> ForthResult<Flow> {
        let second = self.kernel.peek(1)?;
        self.kernel.push(second);
        Ok(Flow::Next)
    }

    pub fn f_rot(&mut self) -> ForthResult<Flow> {
        let [third, second, first] = self.kernel.pop_n::<3>()?;
        self.kernel.push(second);
        self.kernel.push(first);
        self.kernel.push(third);
        Ok(Flow::Next)
    }

    pub fn f_tuck(&mut self) -> ForthResult<Flow> {
        let [second, first] = self.kernel.pop_n::<2>()?;
        self.kernel.push(first);
        self.kernel.push(second);
        self.kernel.push(first);
        Ok(Flow::Next)
    }

    pub fn f_2dup(&mut self) -> ForthResult<Flow> {
        let a = self.kernel.peek(1)?;
        let b = self.kernel.peek(0)?;
        self.kernel.push(a);
        self.kernel.push(b);
        Ok(Flow::Next)
    }

    pub fn f_2swap(&mut self) -> ForthResult<Flow> {
        let [a, b, c, d] = self.kernel.pop_n::<4>()?;
        for v in [c, d, a, b] {
            self.kernel.push(v);
        }
        Ok(Flow::Next)
    }

    pub fn f_2over(&mut self) -> ForthResult<Flow> {
        let a = self.kernel.peek(3)?;
        let b = self.kernel.peek(2)?;
        self.kernel.push(a);
        self.kernel.push(b);
        Ok(Flow::Next)
    }

    /// CLEAR ( .. -- ) empties the calculation stack
    pub fn f_clear(&mut self) -> ForthResult<Flow> {
        while self.kernel.stack_len() > 0 {
            self.kernel.pop()?;
        }
        Ok(Flow::Next)
    }

    /// >R ( n -- ) Pops the stack, placing the value on the return stack
    ///
    pub fn f_to_r(&mut self) -> ForthResult<Flow> {
        let val = self.kernel.pop()?;
        self.kernel.push_r(val);
        Ok(Flow::Next)
    }

    /// R> ( -- n ) Pops the return stack, pushing the value to the calculation stack
    ///
    pub fn f_r_from(&mut self) -> ForthResult<Flow> {
        let val = self.kernel.pop_r()?;
        self.kernel.push(val);
        Ok(Flow::Next)
    }

    /// R@ ( -- n ) Gets the top value from the return stack, pushing the value to the calculation stack
    ///
    pub fn f_r_get(&mut self) -> ForthResult<Flow> {
        let val = self.kernel.peek_r(0)?;
        self.kernel.push(val);
        Ok(Flow::Next)
    }

    /// I ( -- n ) Pushes the current loop index to the calculation stack
    ///
    pub fn f_i(&mut self) -> ForthResult<Flow> {
        let val = self.kernel.peek_r(0)?;
        self.kernel.push(val);
        Ok(Flow::Next)
    }

    /// J ( -- n ) Pushes the second level (outer) loop index to the calculation stack
    ///
    pub fn f_j(&mut self) -> ForthResult<Flow> {
        let val = self.kernel.peek_r(1)?;
        self.kernel.push(val);
        Ok(Flow::Next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn run(rt: &mut ForthRuntime, f: fn(&mut ForthRuntime) -> ForthResult<Flow>, stack: &[i64]) -> ForthResult<Flow> {
        for v in stack {
            rt.kernel.push(*v);
        }
        f(rt)
    }

    #[test_case(ForthRuntime::f_plus, 24 ; "plus")]
    #[test_case(ForthRuntime::f_minus, 16 ; "minus")]
    #[test_case(ForthRuntime::f_times, 80 ; "times")]
    #[test_case(ForthRuntime::f_divide, 5 ; "divide")]
    #[test_case(ForthRuntime::f_mod, 0 ; "modulo")]
    fn test_simple_math(op: fn(&mut ForthRuntime) -> ForthResult<Flow>, expected: i64) {
        let mut rt = ForthRuntime::new();
        run(&mut rt, op, &[7, 20, 4]).unwrap();
        assert_eq!(rt.kernel.values(), vec![7, expected]);
    }

    #[test_case(-7, 2, -4, 1 ; "negative dividend")]
    #[test_case(7, -2, -4, -1 ; "negative divisor")]
    #[test_case(-7, -2, 3, -1 ; "both negative")]
    #[test_case(17, 3, 5, 2 ; "positive")]
    #[test_case(i64::MIN, -1, i64::MIN, 0 ; "overflow wraps")]
    fn test_floor_divmod(a: i64, b: i64, q: i64, r: i64) {
        assert_eq!(u_floor_divmod(a, b), Ok((q, r)));
    }

    #[test]
    fn test_divide_by_zero_keeps_stack() {
        let mut rt = ForthRuntime::new();
        assert_eq!(
            run(&mut rt, ForthRuntime::f_divide, &[1, 0]),
            Err(ForthError::DivisionByZero)
        );
        assert_eq!(rt.kernel.values(), vec![1, 0]);
        assert_eq!(
            ForthRuntime::f_slash_mod(&mut rt),
            Err(ForthError::DivisionByZero)
        );
        assert_eq!(rt.kernel.values(), vec![1, 0]);
    }

    #[test]
    fn test_slash_mod() {
        let mut rt = ForthRuntime::new();
        run(&mut rt, ForthRuntime::f_slash_mod, &[17, 3]).unwrap();
        assert_eq!(rt.kernel.values(), vec![2, 5]);
    }

    #[test_case(ForthRuntime::f_greater, 3, 2, TRUE)]
    #[test_case(ForthRuntime::f_greater, 2, 3, FALSE)]
    #[test_case(ForthRuntime::f_greater_equal, 3, 3, TRUE)]
    #[test_case(ForthRuntime::f_less, 2, 3, TRUE)]
    #[test_case(ForthRuntime::f_less_equal, 4, 3, FALSE)]
    #[test_case(ForthRuntime::f_equal, 5, 5, TRUE)]
    #[test_case(ForthRuntime::f_not_equal, 5, 5, FALSE)]
    #[test_case(ForthRuntime::f_and, 12, 10, 8)]
    #[test_case(ForthRuntime::f_or, 12, 10, 14)]
    fn test_binary(op: fn(&mut ForthRuntime) -> ForthResult<Flow>, a: i64, b: i64, expected: i64) {
        let mut rt = ForthRuntime::new();
        run(&mut rt, op, &[a, b]).unwrap();
        assert_eq!(rt.kernel.values(), vec![expected]);
    }

    #[test]
    fn test_unary() {
        let mut rt = ForthRuntime::new();
        run(&mut rt, ForthRuntime::f_invert, &[0]).unwrap();
        assert_eq!(rt.kernel.values(), vec![-1]);
        run(&mut rt, ForthRuntime::f_0equal, &[]).unwrap();
        assert_eq!(rt.kernel.values(), vec![FALSE]);
        run(&mut rt, ForthRuntime::f_0equal, &[]).unwrap();
        assert_eq!(rt.kernel.values(), vec![TRUE]);
        run(&mut rt, ForthRuntime::f_0less, &[]).unwrap();
        assert_eq!(rt.kernel.values(), vec![TRUE]);
    }

    #[test_case(ForthRuntime::f_dup, &[1, 9], &[1, 9, 9] ; "dup")]
    #[test_case(ForthRuntime::f_drop, &[1, 9], &[1] ; "drop")]
    #[test_case(ForthRuntime::f_swap, &[5, 12], &[12, 5] ; "swap")]
    #[test_case(ForthRuntime::f_over, &[1, 2], &[1, 2, 1] ; "over")]
    #[test_case(ForthRuntime::f_rot, &[1, 2, 3], &[2, 3, 1] ; "rot")]
    #[test_case(ForthRuntime::f_tuck, &[1, 2], &[2, 1, 2] ; "tuck")]
    #[test_case(ForthRuntime::f_2dup, &[1, 2], &[1, 2, 1, 2] ; "two dup")]
    #[test_case(ForthRuntime::f_2swap, &[1, 2, 3, 4], &[3, 4, 1, 2] ; "two swap")]
    #[test_case(ForthRuntime::f_2over, &[1, 2, 3, 4], &[1, 2, 3, 4, 1, 2] ; "two over")]
    fn test_shuffles(op: fn(&mut ForthRuntime) -> ForthResult<Flow>, before: &[i64], after: &[i64]) {
        let mut rt = ForthRuntime::new();
        run(&mut rt, op, before).unwrap();
        assert_eq!(rt.kernel.values(), after.to_vec());
    }

    #[test_case(ForthRuntime::f_dup, &[] ; "dup")]
    #[test_case(ForthRuntime::f_drop, &[] ; "drop")]
    #[test_case(ForthRuntime::f_swap, &[1] ; "swap")]
    #[test_case(ForthRuntime::f_over, &[1] ; "over")]
    #[test_case(ForthRuntime::f_rot, &[1, 2] ; "rot")]
    #[test_case(ForthRuntime::f_tuck, &[1] ; "tuck")]
    #[test_case(ForthRuntime::f_2swap, &[1, 2, 3] ; "two swap")]
    #[test_case(ForthRuntime::f_2over, &[1, 2, 3] ; "two over")]
    #[test_case(ForthRuntime::f_plus, &[1] ; "plus")]
    #[test_case(ForthRuntime::f_slash_mod, &[1] ; "slash mod")]
    fn test_underflow_leaves_stack(op: fn(&mut ForthRuntime) -> ForthResult<Flow>, before: &[i64]) {
        let mut rt = ForthRuntime::new();
        assert_eq!(run(&mut rt, op, before), Err(ForthError::StackUnderflow));
        assert_eq!(rt.kernel.values(), before.to_vec());
    }

    #[test]
    fn test_return_stack_words() {
        let mut rt = ForthRuntime::new();
        run(&mut rt, ForthRuntime::f_to_r, &[7]).unwrap();
        assert!(rt.kernel.values().is_empty());
        ForthRuntime::f_r_get(&mut rt).unwrap();
        ForthRuntime::f_r_from(&mut rt).unwrap();
        assert_eq!(rt.kernel.values(), vec![7, 7]);
        assert_eq!(
            ForthRuntime::f_r_from(&mut rt),
            Err(ForthError::ReturnStackUnderflow)
        );
    }

    #[test]
    fn test_loop_indexes() {
        let mut rt = ForthRuntime::new();
        rt.kernel.push_r(3); // outer
        rt.kernel.push_r(8); // inner
        ForthRuntime::f_i(&mut rt).unwrap();
        ForthRuntime::f_j(&mut rt).unwrap();
        assert_eq!(rt.kernel.values(), vec![8, 3]);
        assert_eq!(rt.kernel.return_len(), 2);
    }

    #[test]
    fn test_clear() {
        let mut rt = ForthRuntime::new();
        run(&mut rt, ForthRuntime::f_clear, &[1, 2, 3]).unwrap();
        assert_eq!(rt.kernel.stack_len(), 0);
    }
}
