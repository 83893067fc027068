//! Two rayon thread pools splitting generation work from meshing work
//! (§4.4), so a burst of newly-visible chunks generating terrain can't
//! starve mesh uploads for chunks already generated. Unlike the thread
//! pool this was grounded on, nothing here does file or network I/O, so
//! there's no async runtime riding alongside the pools.

use rayon::{ThreadPool, ThreadPoolBuilder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolCategory {
    Generation,
    Meshing,
}

pub struct JobSystem {
    generation: ThreadPool,
    meshing: ThreadPool,
}

impl JobSystem {
    pub fn new() -> Self {
        let cpus = num_cpus::get().max(2);
        let generation_threads = (cpus / 2).max(1);
        let meshing_threads = (cpus - generation_threads).max(1);
        Self {
            generation: ThreadPoolBuilder::new()
                .num_threads(generation_threads)
                .thread_name(|i| format!("voxel-gen-{i}"))
                .build()
                .expect("failed to build generation thread pool"),
            meshing: ThreadPoolBuilder::new()
                .num_threads(meshing_threads)
                .thread_name(|i| format!("voxel-mesh-{i}"))
                .build()
                .expect("failed to build meshing thread pool"),
        }
    }

    pub fn thread_counts(&self) -> (usize, usize) {
        (self.generation.current_num_threads(), self.meshing.current_num_threads())
    }

    pub fn spawn(&self, category: PoolCategory, job: impl FnOnce() + Send + 'static) {
        match category {
            PoolCategory::Generation => self.generation.spawn(job),
            PoolCategory::Meshing => self.meshing.spawn(job),
        }
    }
}

impl Default for JobSystem {
    fn default() -> Self {
        Self::new()
    }
}
