// BufferPool reuse, bounds and concurrent stream safety.

mod common;

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use zstd_stream_core::{
        compression::{BufferPool, BufferRole, Reader, Writer},
        config::StreamConfig,
    };

    use crate::common::random_bytes;

    #[test]
    fn acquire_returns_requested_length() {
        let pool = BufferPool::new();
        let buf = pool.acquire(BufferRole::CompressedInput, 1000);
        assert_eq!(buf.len(), 1000);
        assert_eq!(buf.role(), BufferRole::CompressedInput);
    }

    #[test]
    fn released_storage_is_reused() {
        let pool = BufferPool::new();
        let buf = pool.acquire(BufferRole::DecodedOutput, 4096);
        let ptr = buf.as_ptr();
        pool.release(buf);
        assert_eq!(pool.retained(BufferRole::DecodedOutput), 1);

        let again = pool.acquire(BufferRole::DecodedOutput, 1024);
        assert_eq!(again.as_ptr(), ptr);
        assert_eq!(again.len(), 1024);
        assert_eq!(pool.retained(BufferRole::DecodedOutput), 0);
    }

    #[test]
    fn live_buffers_never_alias() {
        let pool = BufferPool::new();
        let a = pool.acquire(BufferRole::CompressedInput, 64);
        pool.release(pool.acquire(BufferRole::CompressedInput, 64));
        let b = pool.acquire(BufferRole::CompressedInput, 64);
        let c = pool.acquire(BufferRole::CompressedInput, 64);
        assert_ne!(a.as_ptr(), b.as_ptr());
        assert_ne!(b.as_ptr(), c.as_ptr());
        assert_ne!(a.as_ptr(), c.as_ptr());
    }

    #[test]
    fn roles_are_independent() {
        let pool = BufferPool::new();
        pool.release(pool.acquire(BufferRole::CompressedInput, 8));
        assert_eq!(pool.retained(BufferRole::CompressedInput), 1);
        assert_eq!(pool.retained(BufferRole::DecodedOutput), 0);
    }

    #[test]
    fn retention_is_bounded() {
        let pool = BufferPool::with_retain(2);
        let bufs: Vec<_> = (0..5).map(|_| pool.acquire(BufferRole::DecodedOutput, 16)).collect();
        for b in bufs {
            pool.release(b);
        }
        assert_eq!(pool.retained(BufferRole::DecodedOutput), 2);
    }

    #[test]
    fn concurrent_streams_never_cross_deliver() {
        const THREADS: usize = 8;
        const ROUNDS: usize = 6;

        let pool = Arc::new(BufferPool::with_retain(4));
        let config = StreamConfig::default().with_pool(pool.clone());

        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let config = config.clone();
                thread::spawn(move || {
                    for round in 0..ROUNDS {
                        let seed = (t * ROUNDS + round) as u64;
                        let data = random_bytes(20_000 + t * 1_333 + round * 77, seed);

                        let mut compressed = Vec::new();
                        let mut w = Writer::with_config(&mut compressed, 1, None, config.clone());
                        w.write(&data).unwrap();
                        w.close().unwrap();
                        drop(w);

                        let mut r = Reader::with_config(compressed.as_slice(), None, config.clone());
                        let mut out = Vec::new();
                        let mut buf = vec![0u8; 3_000];
                        loop {
                            let n = r.read(&mut buf).unwrap();
                            if n == 0 {
                                break;
                            }
                            out.extend_from_slice(&buf[..n]);
                        }
                        r.close().unwrap();
                        assert!(out == data, "thread {t} round {round} received foreign bytes");
                    }
                })
            })
            .collect();

        for h in handles {
            h.join().expect("worker panicked");
        }
        assert!(pool.retained(BufferRole::CompressedInput) <= 4);
        assert!(pool.retained(BufferRole::DecodedOutput) >= 1);
    }
}
