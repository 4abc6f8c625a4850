use std::future::Future;
use std::pin::Pin;

/// 协作端口返回的 future。全部运行在同一逻辑线程上，不要求 `Send`。
pub type LocalBoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;
