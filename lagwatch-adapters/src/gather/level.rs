use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

use tracing::{debug, warn};
use url::Url;

use super::{child_address, pool, redacted, Fetcher, Whitelist};
use crate::GatherError;

/// Worker count used when a level does not configure one.
pub const DEFAULT_WORKERS: usize = 10;

/// A child resource about to be fetched: the name it was listed under and
/// the address composed for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Child {
    pub name: String,
    pub address: Url,
}

/// Settings for one level of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelConfig {
    /// Maximum concurrent fetches at this level, per parent. Zero is treated
    /// as one.
    pub workers: usize,

    /// Names this level may visit.
    pub whitelist: Whitelist,
}

impl LevelConfig {
    pub fn new(workers: usize) -> Self {
        Self {
            workers,
            whitelist: Whitelist::allow_all(),
        }
    }

    pub fn with_whitelist(mut self, whitelist: Whitelist) -> Self {
        self.whitelist = whitelist;
        self
    }
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self::new(DEFAULT_WORKERS)
    }
}

/// Fan out one level below `parent`.
///
/// `candidates` are the child names listed in the parent's response. Names
/// the level's whitelist rejects are dropped and duplicates are visited
/// once. Each remaining name becomes `parent/<name>/<suffix..>`, is fetched
/// on the level's worker pool, and its response is passed to `on_result`
/// along with the [`Child`] it came from. `on_result` may emit records, recurse into the
/// next level, or both, and returns the errors its branch produced.
///
/// Returns once every child has completed, with the errors of every branch.
/// A failed fetch skips that child only.
pub async fn gather<R, H, Fut>(
    fetcher: &Arc<dyn Fetcher<Response = R>>,
    level: &LevelConfig,
    parent: &Url,
    candidates: &[String],
    suffix: &[&str],
    on_result: H,
) -> Vec<GatherError>
where
    R: Send + 'static,
    H: Fn(Child, R) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Vec<GatherError>> + Send + 'static,
{
    let names = level.whitelist.filter(candidates);

    let mut errors = Vec::new();
    let mut seen = HashSet::with_capacity(names.len());
    let mut children = Vec::with_capacity(names.len());
    for name in &names {
        if !seen.insert(name.as_str()) {
            continue;
        }
        match child_address(parent, name, suffix) {
            Ok(address) => children.push(Child {
                name: name.clone(),
                address,
            }),
            Err(err) => errors.push(err),
        }
    }

    if children.is_empty() {
        return errors;
    }

    debug!(
        parent = %redacted(parent),
        children = children.len(),
        workers = level.workers,
        "Fanning out"
    );

    let fetcher = Arc::clone(fetcher);
    let on_result = Arc::new(on_result);
    let drained = pool::run(level.workers, children, move |child: Child| {
        let fetcher = Arc::clone(&fetcher);
        let on_result = Arc::clone(&on_result);
        async move {
            match fetcher.fetch(&child.address).await {
                Ok(response) => (*on_result)(child, response).await,
                Err(err) => {
                    warn!(address = %redacted(&child.address), error = %err, "Skipping branch");
                    vec![err]
                }
            }
        }
    })
    .await;

    errors.extend(drained.errors);
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lagwatch_sdk::MemoryAccumulator;
    use lagwatch_types::{Accumulator, MetricRecord};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory resource tree. Each address lists its child names.
    #[derive(Default)]
    struct FakeTree {
        nodes: HashMap<String, Vec<String>>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeTree {
        fn node(mut self, address: &str, children: &[&str]) -> Self {
            self.nodes.insert(
                address.to_string(),
                children.iter().map(|c| c.to_string()).collect(),
            );
            self
        }

        fn calls(&self) -> Vec<String> {
            let mut calls = self.calls.lock().unwrap().clone();
            calls.sort();
            calls
        }
    }

    #[async_trait]
    impl Fetcher for FakeTree {
        type Response = Vec<String>;

        async fn fetch(&self, address: &Url) -> Result<Vec<String>, GatherError> {
            self.calls.lock().unwrap().push(address.to_string());
            self.nodes
                .get(address.as_str())
                .cloned()
                .ok_or_else(|| GatherError::Status {
                    url: address.to_string(),
                    status: 404,
                })
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn leaf_record(address: &Url) -> MetricRecord {
        MetricRecord::builder("leaf")
            .tag("path", address.path())
            .field("seen", 1i64)
            .build()
    }

    /// Two levels: a record per leaf, the first level recursing.
    async fn walk_two_levels(
        tree: Arc<FakeTree>,
        acc: Arc<MemoryAccumulator>,
        roots: &[String],
        top: LevelConfig,
    ) -> Vec<GatherError> {
        let fetcher: Arc<dyn Fetcher<Response = Vec<String>>> = tree;
        let root = Url::parse("http://api/v2").unwrap();
        let inner = Arc::clone(&fetcher);

        gather(&fetcher, &top, &root, roots, &[], move |parent, children| {
            let fetcher = Arc::clone(&inner);
            let acc = Arc::clone(&acc);
            async move {
                gather(
                    &fetcher,
                    &LevelConfig::new(2),
                    &parent.address,
                    &children,
                    &["detail"],
                    move |leaf, _| {
                        let acc = Arc::clone(&acc);
                        async move {
                            acc.add_record(leaf_record(&leaf.address));
                            Vec::<GatherError>::new()
                        }
                    },
                )
                .await
            }
        })
        .await
    }

    #[tokio::test]
    async fn single_level_emits_one_record_per_child() {
        let tree = FakeTree::default()
            .node("http://api/v2/a", &[])
            .node("http://api/v2/b", &[])
            .node("http://api/v2/c", &[]);
        let fetcher: Arc<dyn Fetcher<Response = Vec<String>>> = Arc::new(tree);
        let acc = Arc::new(MemoryAccumulator::new());
        let root = Url::parse("http://api/v2").unwrap();

        let sink = Arc::clone(&acc);
        let errors = gather(
            &fetcher,
            &LevelConfig::new(2),
            &root,
            &names(&["a", "b", "c"]),
            &[],
            move |child, _| {
                let sink = Arc::clone(&sink);
                async move {
                    assert_eq!(child.address.path(), format!("/v2/{}", child.name));
                    sink.add_record(leaf_record(&child.address));
                    Vec::<GatherError>::new()
                }
            },
        )
        .await;

        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(acc.len(), 3);
        for path in ["/v2/a", "/v2/b", "/v2/c"] {
            assert!(acc.find("leaf", [("path", path)]).is_some(), "{path}");
        }
    }

    #[tokio::test]
    async fn failed_leaf_skips_only_its_branch() {
        let tree = Arc::new(
            FakeTree::default()
                .node("http://api/v2/x", &["x1", "x2"])
                .node("http://api/v2/y", &["y1"])
                .node("http://api/v2/x/x1/detail", &[])
                .node("http://api/v2/x/x2/detail", &[]),
        );
        let acc = Arc::new(MemoryAccumulator::new());

        let errors = walk_two_levels(
            Arc::clone(&tree),
            Arc::clone(&acc),
            &names(&["x", "y"]),
            LevelConfig::default(),
        )
        .await;

        assert_eq!(acc.len(), 2);
        assert_eq!(
            errors,
            vec![GatherError::Status {
                url: "http://api/v2/y/y1/detail".to_string(),
                status: 404,
            }]
        );
        assert_eq!(
            tree.calls(),
            vec![
                "http://api/v2/x",
                "http://api/v2/x/x1/detail",
                "http://api/v2/x/x2/detail",
                "http://api/v2/y",
                "http://api/v2/y/y1/detail",
            ]
        );
    }

    #[tokio::test]
    async fn whitelist_prevents_fetches() {
        let tree = Arc::new(
            FakeTree::default()
                .node("http://api/v2/x", &["x1"])
                .node("http://api/v2/y", &["y1"])
                .node("http://api/v2/z", &["z1"])
                .node("http://api/v2/x/x1/detail", &[])
                .node("http://api/v2/y/y1/detail", &[])
                .node("http://api/v2/z/z1/detail", &[]),
        );
        let acc = Arc::new(MemoryAccumulator::new());

        let top = LevelConfig::new(4).with_whitelist(Whitelist::new(["y"]));
        let errors = walk_two_levels(
            Arc::clone(&tree),
            Arc::clone(&acc),
            &names(&["x", "y", "z"]),
            top,
        )
        .await;

        assert!(errors.is_empty());
        assert_eq!(acc.len(), 1);
        assert_eq!(
            tree.calls(),
            vec!["http://api/v2/y", "http://api/v2/y/y1/detail"]
        );
    }

    #[tokio::test]
    async fn empty_level_returns_without_fetching() {
        let tree = Arc::new(FakeTree::default());
        let fetcher: Arc<dyn Fetcher<Response = Vec<String>>> = tree.clone();
        let root = Url::parse("http://api/v2").unwrap();

        let errors = gather(&fetcher, &LevelConfig::default(), &root, &[], &[], |_, _| async {
            Vec::<GatherError>::new()
        })
        .await;
        assert!(errors.is_empty());

        let filtered = LevelConfig::default().with_whitelist(Whitelist::new(["nope"]));
        let errors = gather(&fetcher, &filtered, &root, &names(&["a"]), &[], |_, _| async {
            Vec::<GatherError>::new()
        })
        .await;
        assert!(errors.is_empty());
        assert!(tree.calls().is_empty());
    }

    #[tokio::test]
    async fn duplicate_candidates_are_fetched_once() {
        let tree = Arc::new(FakeTree::default().node("http://api/v2/a", &[]));
        let fetcher: Arc<dyn Fetcher<Response = Vec<String>>> = tree.clone();
        let root = Url::parse("http://api/v2").unwrap();

        let errors = gather(
            &fetcher,
            &LevelConfig::default(),
            &root,
            &names(&["a", "a", "a"]),
            &[],
            |_, _| async { Vec::<GatherError>::new() },
        )
        .await;

        assert!(errors.is_empty());
        assert_eq!(tree.calls(), vec!["http://api/v2/a"]);
    }

    #[tokio::test]
    async fn repeated_cycles_emit_the_same_records() {
        let tree = Arc::new(
            FakeTree::default()
                .node("http://api/v2/x", &["x1", "x2"])
                .node("http://api/v2/y", &["y1"])
                .node("http://api/v2/x/x1/detail", &[])
                .node("http://api/v2/x/x2/detail", &[])
                .node("http://api/v2/y/y1/detail", &[]),
        );
        let roots = names(&["x", "y"]);

        let mut cycles = Vec::new();
        for _ in 0..2 {
            let acc = Arc::new(MemoryAccumulator::new());
            let errors =
                walk_two_levels(Arc::clone(&tree), Arc::clone(&acc), &roots, LevelConfig::new(1))
                    .await;
            assert!(errors.is_empty());

            let mut records = acc.drain();
            records.sort_by(|a, b| a.tags.cmp(&b.tags));
            cycles.push(records);
        }

        assert_eq!(cycles[0].len(), 3);
        assert_eq!(cycles[0], cycles[1]);
    }
}
