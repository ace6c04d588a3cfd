use std::collections::BTreeMap;

use futures::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::info;
use yatra_core::{Budget, Operation, QuickInfoCategory, RequestResult};

use crate::RequestGateway;

impl RequestGateway {
    /// Runs independent calls concurrently and collects each outcome under its
    /// key. One failure never cancels the rest; a repeated key keeps the last
    /// result.
    pub async fn invoke_batch<K>(
        &self,
        operations: Vec<(K, Operation)>,
        cancel: &CancellationToken,
    ) -> BTreeMap<K, RequestResult>
    where
        K: Ord,
    {
        let total = operations.len();
        let calls = operations.into_iter().map(|(key, operation)| async move {
            let result = self.invoke_with_cancel(&operation, cancel).await;
            (key, result)
        });

        let results = join_all(calls).await.into_iter().collect::<BTreeMap<_, _>>();

        let failed = results.values().filter(|result| !result.is_success()).count();
        info!(total, failed, "batch finished");
        results
    }

    pub async fn quick_info_all(
        &self,
        location: &str,
        days: Option<u32>,
        budget: Option<Budget>,
        cancel: &CancellationToken,
    ) -> BTreeMap<QuickInfoCategory, RequestResult> {
        let operations = QuickInfoCategory::ALL
            .into_iter()
            .map(|category| {
                (
                    category,
                    Operation::QuickInfo {
                        category,
                        location: location.to_string(),
                        days,
                        budget,
                    },
                )
            })
            .collect();

        self.invoke_batch(operations, cancel).await
    }
}
