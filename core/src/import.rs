use std::{thread, time::Instant};

use crossbeam_channel::bounded;
use geo::Point;
use log::{debug, info};

use crate::{
    error::{Error, Result},
    index::{IndexedRecord, TilePyramidIndexer, ZoomRange},
    storage::Store,
};

/// The number of points a worker thread indexes at once
pub const CHUNK_SIZE: usize = 1024;

/// Indexes all `points` at every zoom level in `range`. The work is spread
/// over all available CPUs. The returned records have the same order as
/// `points`. If any point is invalid, no records are returned at all.
pub fn index_points(points: &[Point], range: ZoomRange) -> Result<Vec<IndexedRecord>> {
    if points.is_empty() {
        return Ok(Vec::new());
    }

    let indexer = TilePyramidIndexer::new(range);
    let n_chunks = points.len().div_ceil(CHUNK_SIZE);
    let n_workers = num_cpus::get().clamp(1, n_chunks);

    let (chunk_send, chunk_recv) = bounded::<(usize, &[Point])>(n_workers * 2);
    let (result_send, result_recv) = bounded::<(usize, Result<Vec<IndexedRecord>>)>(n_workers * 2);

    thread::scope(|s| {
        for _ in 0..n_workers {
            let chunk_recv = chunk_recv.clone();
            let result_send = result_send.clone();
            s.spawn(move || {
                for (i, chunk) in chunk_recv {
                    let records = chunk
                        .iter()
                        .map(|p| indexer.index(*p))
                        .collect::<Result<Vec<_>>>();
                    if result_send.send((i, records)).is_err() {
                        // the receiver gave up
                        break;
                    }
                }
            });
        }

        // only the workers hold these now, so the channels disconnect
        // as soon as all workers have finished
        drop(chunk_recv);
        drop(result_send);

        s.spawn(move || {
            for c in points.chunks(CHUNK_SIZE).enumerate() {
                if chunk_send.send(c).is_err() {
                    break;
                }
            }
        });

        // chunks arrive in arbitrary order
        let mut chunks = (0..n_chunks).map(|_| None).collect::<Vec<_>>();
        for (i, records) in result_recv {
            chunks[i] = Some(records?);
        }

        Ok(chunks.into_iter().flatten().flatten().collect())
    })
}

/// Indexes `points` and inserts the resulting records into `store` in a
/// single batch. Either all points are imported or none. Returns the number
/// of imported records.
pub fn import_points<S>(store: &mut S, points: &[Point], range: ZoomRange) -> Result<usize>
where
    S: Store + ?Sized,
{
    let start = Instant::now();

    let records = index_points(points, range)?;
    debug!(
        "Indexed {} points at zoom levels {}..={} in {:?}",
        records.len(),
        range.min(),
        range.max(),
        start.elapsed()
    );

    let n = store.insert_many(records).map_err(Error::from_store)?;
    store.commit().map_err(Error::from_store)?;

    info!("Imported {n} records in {:?}", start.elapsed());

    Ok(n)
}
