// Debugging help

use crate::internals::error::ForthResult;
use crate::internals::messages::DebugLevel;
use crate::internals::token::Flow;
use crate::runtime::ForthRuntime;

impl ForthRuntime {
    /// DEPTH ( -- n ) pushes the number of items on the stack
    ///
    pub fn f_stack_depth(&mut self) -> ForthResult<Flow> {
        let depth = self.kernel.stack_len();
        self.kernel.push(depth as i64);
        Ok(Flow::Next)
    }

    /// DBG ( n -- ) sets the current debug level used by the message module
    ///
    pub fn f_dbg(&mut self) -> ForthResult<Flow> {
        let n = self.kernel.pop()?;
        self.msg.set_level(DebugLevel::from_number(n));
        self.msg.info("DBG", "message level", Some(self.msg.get_level()));
        Ok(Flow::Next)
    }
}
