// typed indices into arena vectors, so a trie node index can't be used to index steppers
#[macro_export]
macro_rules! make_type_idx {
    ($vis:vis $type_idx_name:ident, $type_name:ty) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        $vis struct $type_idx_name(u32);

        impl $type_idx_name {
            $vis fn from_push(vec: &mut Vec<$type_name>, val: $type_name) -> $type_idx_name {
                let idx = $type_idx_name(vec.len() as u32);
                vec.push(val);
                idx
            }

            $vis fn as_usize(self) -> usize {
                self.0 as usize
            }
        }

        impl std::ops::Index<$type_idx_name> for [$type_name] {
            type Output = $type_name;

            fn index(&self, index: $type_idx_name) -> &Self::Output {
                &self[index.0 as usize]
            }
        }

        impl std::ops::IndexMut<$type_idx_name> for [$type_name] {
            fn index_mut(&mut self, index: $type_idx_name) -> &mut Self::Output {
                &mut self[index.0 as usize]
            }
        }

        impl std::ops::Index<$type_idx_name> for Vec<$type_name> {
            type Output = $type_name;

            fn index(&self, index: $type_idx_name) -> &Self::Output {
                &self.as_slice()[index]
            }
        }

        impl std::ops::IndexMut<$type_idx_name> for Vec<$type_name> {
            fn index_mut(&mut self, index: $type_idx_name) -> &mut Self::Output {
                &mut self.as_mut_slice()[index]
            }
        }
    };
}
