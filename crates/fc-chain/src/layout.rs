//! Placement of every domain in the global unknown vector.
//!
//! Domains are laid out in chain order with no gaps: domain `i` starts where
//! domain `i - 1` ends, and its grid points continue the global point count.

use fc_core::DomainId;
use fc_domains::{Domain, Extent};
use std::ops::Range;

/// Extents for all domains plus the totals they add up to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layout {
    extents: Vec<Extent>,
    len: usize,
    n_points: usize,
}

impl Layout {
    /// Lay out `(nv, np)` shapes in order.
    pub fn compute(shapes: impl IntoIterator<Item = (usize, usize)>) -> Self {
        let mut extents = Vec::new();
        let mut offset = 0;
        let mut first_point = 0;
        for (nv, np) in shapes {
            let ext = Extent {
                offset,
                nv,
                np,
                first_point,
            };
            offset = ext.end();
            first_point += np;
            extents.push(ext);
        }
        Self {
            extents,
            len: offset,
            n_points: first_point,
        }
    }

    pub fn from_domains(domains: &[Domain]) -> Self {
        Self::compute(domains.iter().map(|d| (d.nv(), d.np())))
    }

    pub fn extent(&self, id: DomainId) -> Option<Extent> {
        self.extents.get(id.slot()).copied()
    }

    pub fn extents(&self) -> &[Extent] {
        &self.extents
    }

    /// Total number of unknowns.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total number of grid points.
    pub fn n_points(&self) -> usize {
        self.n_points
    }

    /// Domain owning global grid point `point`.
    pub fn domain_of_point(&self, point: usize) -> Option<DomainId> {
        if point >= self.n_points {
            return None;
        }
        // first extent whose points extend past `point`
        let slot = self
            .extents
            .partition_point(|e| e.first_point + e.np <= point);
        Some(DomainId::from_index(slot as u32))
    }

    /// Domain, local point, and component of a global row.
    pub fn locate(&self, row: usize) -> Option<(DomainId, usize, usize)> {
        if row >= self.len {
            return None;
        }
        let slot = self.extents.partition_point(|e| e.end() <= row);
        let ext = self.extents.get(slot)?;
        let local = row - ext.offset;
        Some((DomainId::from_index(slot as u32), local / ext.nv, local % ext.nv))
    }

    /// Rows holding the unknowns of global grid point `point`.
    pub fn point_rows(&self, point: usize) -> Option<Range<usize>> {
        let id = self.domain_of_point(point)?;
        let ext = self.extents.get(id.slot())?;
        let start = ext.index(point - ext.first_point, 0);
        Some(start..start + ext.nv)
    }

    /// Rows whose residuals can change when the unknowns at `point` change.
    ///
    /// Every residual depends on unknowns at most two grid points away.
    pub fn rows_touched_by(&self, point: usize) -> Range<usize> {
        if self.n_points == 0 {
            return 0..0;
        }
        let lo = point.saturating_sub(2).min(self.n_points - 1);
        let hi = (point + 2).min(self.n_points - 1);
        match (self.point_rows(lo), self.point_rows(hi)) {
            (Some(first), Some(last)) => first.start..last.end,
            _ => 0..0,
        }
    }

    /// Split a full-length residual into one disjoint slice per domain.
    pub fn split<'a>(&self, r: &'a mut [f64]) -> Vec<&'a mut [f64]> {
        let mut rest = r;
        let mut slices = Vec::with_capacity(self.extents.len());
        for ext in &self.extents {
            let (head, tail) = std::mem::take(&mut rest).split_at_mut(ext.len());
            slices.push(head);
            rest = tail;
        }
        slices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn inlet_column_outlet() {
        let layout = Layout::compute([(2, 1), (5, 4), (1, 1)]);
        assert_eq!(layout.len(), 23);
        assert_eq!(layout.n_points(), 6);

        let column = layout.extent(DomainId::from_index(1)).unwrap();
        assert_eq!(column.offset, 2);
        assert_eq!(column.first_point, 1);
        assert_eq!(layout.point_rows(0), Some(0..2));
        assert_eq!(layout.point_rows(2), Some(7..12));
        assert_eq!(layout.point_rows(5), Some(22..23));
        assert_eq!(layout.point_rows(6), None);

        assert_eq!(layout.locate(8), Some((DomainId::from_index(1), 1, 1)));
        assert_eq!(layout.locate(22), Some((DomainId::from_index(2), 0, 0)));
        assert_eq!(layout.locate(23), None);
    }

    #[test]
    fn touched_rows_clamp_at_ends() {
        let layout = Layout::compute([(2, 1), (5, 4), (1, 1)]);
        assert_eq!(layout.rows_touched_by(0), 0..12);
        assert_eq!(layout.rows_touched_by(5), 12..23);
        assert_eq!(layout.rows_touched_by(3), 2..23);
    }

    #[test]
    fn zero_point_domains_own_no_rows() {
        let layout = Layout::compute([(2, 1), (3, 0), (5, 4), (1, 0), (1, 1)]);
        assert_eq!(layout.len(), 23);
        assert_eq!(layout.n_points(), 6);
        assert_eq!(layout.extents()[1].range(), 2..2);
        assert_eq!(layout.extents()[3].range(), 22..22);

        assert_eq!(layout.domain_of_point(0), Some(DomainId::from_index(0)));
        assert_eq!(layout.domain_of_point(1), Some(DomainId::from_index(2)));
        assert_eq!(layout.domain_of_point(5), Some(DomainId::from_index(4)));
        assert_eq!(layout.point_rows(1), Some(2..7));
        assert_eq!(layout.point_rows(5), Some(22..23));
        assert_eq!(layout.locate(2), Some((DomainId::from_index(2), 0, 0)));
        assert_eq!(layout.locate(22), Some((DomainId::from_index(4), 0, 0)));
        assert_eq!(layout.rows_touched_by(0), 0..12);
        assert_eq!(layout.rows_touched_by(5), 12..23);

        let mut r = vec![0.0; layout.len()];
        let lens: Vec<usize> = layout.split(&mut r).iter().map(|s| s.len()).collect();
        assert_eq!(lens, vec![2, 0, 20, 0, 1]);
    }

    #[test]
    fn split_matches_extents() {
        let layout = Layout::compute([(2, 1), (3, 2), (1, 1)]);
        let mut r = vec![0.0; layout.len()];
        let slices = layout.split(&mut r);
        let lens: Vec<usize> = slices.iter().map(|s| s.len()).collect();
        assert_eq!(lens, vec![2, 6, 1]);
    }

    proptest! {
        #[test]
        fn extents_partition_the_vector(
            shapes in prop::collection::vec((1usize..6, 0usize..8), 1..10)
        ) {
            let layout = Layout::compute(shapes.iter().copied());
            let mut next = 0;
            let mut point = 0;
            for (ext, &(nv, np)) in layout.extents().iter().zip(&shapes) {
                prop_assert_eq!(ext.offset, next);
                prop_assert_eq!(ext.first_point, point);
                prop_assert_eq!(ext.len(), nv * np);
                next = ext.end();
                point += np;
            }
            prop_assert_eq!(layout.len(), next);
            prop_assert_eq!(layout.n_points(), point);

            for row in 0..layout.len() {
                let (id, p, c) = layout.locate(row).unwrap();
                let ext = layout.extent(id).unwrap();
                prop_assert!(ext.np > 0);
                prop_assert_eq!(ext.index(p, c), row);
            }

            for point in 0..layout.n_points() {
                let id = layout.domain_of_point(point).unwrap();
                let ext = layout.extent(id).unwrap();
                prop_assert!(ext.np > 0);
                let rows = layout.point_rows(point).unwrap();
                prop_assert_eq!(rows.len(), ext.nv);
                let touched = layout.rows_touched_by(point);
                prop_assert!(touched.start <= rows.start && rows.end <= touched.end);
                prop_assert!(touched.end <= layout.len());
            }
        }
    }
}
