//! A small object pool for remote clients that are costly to build.
//!
//! Clients are handed out as [`PooledClient`] leases. A lease puts its client
//! back into the pool when dropped, so every exit path of a request,
//! including cancellation, returns the client exactly once.

use crate::Result;
use std::{
    ops::Deref,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};
use tracing::info;

type Factory<T> = dyn Fn() -> Result<T> + Send + Sync;

pub struct ClientPool<T> {
    idle: Mutex<Vec<T>>,
    factory: Box<Factory<T>>,
    created: AtomicUsize,
    leased: AtomicUsize,
}

impl<T: Send> ClientPool<T> {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> Result<T> + Send + Sync + 'static,
    {
        Self {
            idle: Mutex::new(Vec::new()),
            factory: Box::new(factory),
            created: AtomicUsize::new(0),
            leased: AtomicUsize::new(0),
        }
    }

    /// Eagerly builds clients until at least `count` are idle.
    pub fn warm(&self, count: usize) -> Result<()> {
        while self.available() < count {
            let client = self.build()?;
            self.put(client);
        }
        Ok(())
    }

    /// Takes an idle client, or builds a new one when none is idle.
    pub fn acquire(self: &Arc<Self>) -> Result<PooledClient<T>> {
        let reused = self.lock_idle().pop();
        let client = match reused {
            Some(client) => client,
            None => self.build()?,
        };

        self.leased.fetch_add(1, Ordering::SeqCst);
        info!("Client retrieved from pool");

        Ok(PooledClient {
            client: Some(client),
            pool: Arc::clone(self),
        })
    }

    /// Number of idle clients.
    pub fn available(&self) -> usize {
        self.lock_idle().len()
    }

    /// Number of clients currently out on lease.
    pub fn leased(&self) -> usize {
        self.leased.load(Ordering::SeqCst)
    }

    /// Number of clients the factory has built over the pool's lifetime.
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    fn build(&self) -> Result<T> {
        let client = (self.factory)()?;
        let total = self.created.fetch_add(1, Ordering::SeqCst) + 1;
        info!(total, "Client created");
        Ok(client)
    }

    fn put(&self, client: T) {
        self.lock_idle().push(client);
    }

    fn lock_idle(&self) -> std::sync::MutexGuard<'_, Vec<T>> {
        // A panic while holding the lock cannot leave the Vec half-updated.
        self.idle.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// A client on lease from a [`ClientPool`].
pub struct PooledClient<T: Send> {
    client: Option<T>,
    pool: Arc<ClientPool<T>>,
}

impl<T: Send> Deref for PooledClient<T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.client
            .as_ref()
            .unwrap_or_else(|| unreachable!("client is only taken on drop"))
    }
}

impl<T: Send> Drop for PooledClient<T> {
    fn drop(&mut self) {
        if let Some(client) = self.client.take() {
            self.pool.put(client);
            self.pool.leased.fetch_sub(1, Ordering::SeqCst);
            info!("Client returned to pool");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use pretty_assertions::assert_eq;

    fn counting_pool() -> Arc<ClientPool<usize>> {
        let next = AtomicUsize::new(0);
        Arc::new(ClientPool::new(move || {
            Ok(next.fetch_add(1, Ordering::SeqCst))
        }))
    }

    #[test]
    fn test_acquire_builds_lazily() {
        let pool = counting_pool();
        assert_eq!(pool.created(), 0);

        let client = pool.acquire().unwrap();
        assert_eq!(*client, 0);
        assert_eq!(pool.created(), 1);
        assert_eq!(pool.leased(), 1);
        assert_eq!(pool.available(), 0);
    }

    #[test]
    fn test_drop_returns_client_for_reuse() {
        let pool = counting_pool();

        {
            let _client = pool.acquire().unwrap();
        }
        assert_eq!(pool.available(), 1);
        assert_eq!(pool.leased(), 0);

        let client = pool.acquire().unwrap();
        assert_eq!(*client, 0);
        assert_eq!(pool.created(), 1);
    }

    #[test]
    fn test_concurrent_leases_get_distinct_clients() {
        let pool = counting_pool();

        let first = pool.acquire().unwrap();
        let second = pool.acquire().unwrap();
        assert_ne!(*first, *second);
        assert_eq!(pool.leased(), 2);

        drop(first);
        drop(second);
        assert_eq!(pool.available(), 2);
        assert_eq!(pool.leased(), 0);
    }

    #[test]
    fn test_warm_builds_up_front() {
        let pool = counting_pool();
        pool.warm(3).unwrap();

        assert_eq!(pool.available(), 3);
        assert_eq!(pool.created(), 3);

        pool.warm(2).unwrap();
        assert_eq!(pool.created(), 3);
    }

    #[test]
    fn test_factory_error_propagates() {
        let pool: Arc<ClientPool<usize>> =
            Arc::new(ClientPool::new(|| Err(Error::config("no credentials"))));

        assert!(pool.warm(1).is_err());
        let err = pool.acquire().err().unwrap();
        assert!(err.to_string().contains("no credentials"));
        assert_eq!(pool.leased(), 0);
        assert_eq!(pool.created(), 0);
    }

    #[test]
    fn test_threads_return_every_lease() {
        let pool = counting_pool();
        pool.warm(1).unwrap();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let pool = Arc::clone(&pool);
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        let _client = pool.acquire().unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(pool.leased(), 0);
        assert_eq!(pool.available(), pool.created());
    }
}
