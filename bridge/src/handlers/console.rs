//! `printi` and `prints`: contract debug output routed to tracing. Both
//! report 0 to the caller.

use tracing::info;

use crate::error::BridgeError;
use crate::frame::HostReturn;
use crate::host_impl::HostCall;

pub fn printi(call: &mut HostCall<'_>) -> Result<HostReturn, BridgeError> {
    let [value] = call.frame.args::<1>("printi")?;
    let ctx = call.state.contract();
    info!(
        target: "envcall::contract",
        contract = ctx.contract(),
        method = ctx.method(),
        value,
        "printi"
    );
    Ok(HostReturn::U64(0))
}

pub fn prints(call: &mut HostCall<'_>) -> Result<HostReturn, BridgeError> {
    let [pos, len] = call.frame.args::<2>("prints")?;
    let text = String::from_utf8_lossy(call.memory.read(pos, len)?);
    let ctx = call.state.contract();
    info!(
        target: "envcall::contract",
        contract = ctx.contract(),
        method = ctx.method(),
        %text,
        "prints"
    );
    Ok(HostReturn::U64(0))
}
