use crate::document::block::Block;
use crate::MicroloanResult;

/// Destination for a rendered block sequence.
///
/// The renderers produce blocks once; each sink decides how they look. The
/// plain-text sink turns them into a fixed-width text file, the paginated
/// writer lays them out on pages for the PDF serializer.
pub trait DocumentSink {
    type Output;

    fn write_block(&mut self, block: &Block) -> MicroloanResult<()>;

    fn finish(self) -> MicroloanResult<Self::Output>;
}

/// Feed every block to `sink` in order and return what it produced.
pub fn emit<S: DocumentSink>(blocks: &[Block], mut sink: S) -> MicroloanResult<S::Output> {
    for block in blocks {
        sink.write_block(block)?;
    }
    sink.finish()
}
