//! Batched calls through `system.multicall`.

use serde_json::Value;

use crate::batch::{self, MethodCall, MethodResult};
use crate::error::{Error, Result};

use super::Aria2Client;

impl Aria2Client {
    /// Execute several calls in one request
    ///
    /// Returns one [`MethodResult`] per call, in call order. A failing
    /// sub-call does not fail the batch; only transport failures do. The
    /// secret token is added to every sub-call.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use aria2_dl::*;
    /// # use serde_json::json;
    /// # async fn example(client: Aria2Client) -> Result<()> {
    /// let results = client
    ///     .multicall(vec![
    ///         MethodCall::new("aria2.getVersion", vec![]),
    ///         MethodCall::new("aria2.tellStatus", vec![json!("2089b05ecca3d829")]),
    ///     ])
    ///     .await?;
    /// for result in results {
    ///     match result.error {
    ///         Some(e) => eprintln!("failed: {e}"),
    ///         None => println!("ok: {:?}", result.result),
    ///     }
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn multicall(&self, calls: Vec<MethodCall>) -> Result<Vec<MethodResult>> {
        self.ensure_open()?;
        if calls.is_empty() {
            return Ok(Vec::new());
        }

        let expected = calls.len();
        let calls: Vec<MethodCall> = calls
            .into_iter()
            .map(|call| MethodCall {
                params: self.args(call.params),
                method_name: call.method_name,
            })
            .collect();

        tracing::debug!(calls = expected, "sending multicall");
        let reply = self
            .transport
            .call("system.multicall", vec![serde_json::to_value(&calls)?])
            .await?;

        let Value::Array(elements) = reply else {
            return Err(Error::InvalidResponse(
                "system.multicall did not return an array".to_string(),
            ));
        };
        if elements.len() != expected {
            return Err(Error::InvalidResponse(format!(
                "system.multicall returned {} results for {} calls",
                elements.len(),
                expected
            )));
        }

        Ok(batch::decode_batch(&elements))
    }
}
