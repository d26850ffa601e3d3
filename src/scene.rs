export![bounding_box, builder, mesh, rig];
