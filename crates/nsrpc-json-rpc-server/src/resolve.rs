//! Method resolution over the namespace tree.

use std::sync::Arc;

use crate::error::RpcError;
use crate::handler::MethodHandler;
use crate::namespace::Namespace;

/// Find the handler addressed by `segments`, starting at `root`.
///
/// Every segment but the last names a namespace; the last names a handler
/// in the namespace reached. The walk is a loop, so path depth never
/// grows the stack.
pub fn resolve<'a, S>(
    root: &'a Namespace,
    segments: &[S],
) -> Result<&'a Arc<dyn MethodHandler>, RpcError>
where
    S: AsRef<str>,
{
    let Some((method, namespaces)) = segments.split_last() else {
        return Err(RpcError::method_not_found(""));
    };

    let mut node = root;
    for segment in namespaces {
        node = node.lookup_namespace(segment.as_ref())?;
    }

    node.lookup_handler(method.as_ref())
}

/// Split a dotted method name into path segments.
pub fn split_method<'a>(method: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        return vec![method];
    }
    method.split(separator).collect()
}
