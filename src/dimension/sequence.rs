use std::ops::Index;
use std::ops::IndexMut;

/// Read a slice front to back.
pub(in crate::dimension) struct Forward<D>(pub(crate) D);
/// Read a slice back to front.
pub(in crate::dimension) struct Reverse<D>(pub(crate) D);

impl<T> Index<usize> for Forward<&[T]> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        &self.0[index]
    }
}

impl<T> Index<usize> for Forward<&mut [T]> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        &self.0[index]
    }
}

impl<T> IndexMut<usize> for Forward<&mut [T]> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.0[index]
    }
}

impl<T> Index<usize> for Reverse<&[T]> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        &self.0[self.0.len() - index - 1]
    }
}

impl<T> Index<usize> for Reverse<&mut [T]> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        &self.0[self.0.len() - index - 1]
    }
}

impl<T> IndexMut<usize> for Reverse<&mut [T]> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.0.len();
        &mut self.0[len - index - 1]
    }
}

/// Indexable sequence with length
pub(in crate::dimension) trait Sequence: Index<usize> {
    fn len(&self) -> usize;
}

/// Indexable sequence with length (mut)
pub(in crate::dimension) trait SequenceMut: Sequence + IndexMut<usize> {}

impl<T> Sequence for Forward<&[T]> {
    #[inline]
    fn len(&self) -> usize {
        self.0.len()
    }
}

impl<T> Sequence for Forward<&mut [T]> {
    #[inline]
    fn len(&self) -> usize {
        self.0.len()
    }
}

impl<T> SequenceMut for Forward<&mut [T]> {}

impl<T> Sequence for Reverse<&[T]> {
    #[inline]
    fn len(&self) -> usize {
        self.0.len()
    }
}

impl<T> Sequence for Reverse<&mut [T]> {
    #[inline]
    fn len(&self) -> usize {
        self.0.len()
    }
}

impl<T> SequenceMut for Reverse<&mut [T]> {}
